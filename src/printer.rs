//! Conversation output
//!
//! The replayed conversation goes to stdout in color; diagnostics go
//! through tracing instead.

use colored::Colorize;

use crate::playback::render::Rendered;
use crate::playback::resolver::ResolvedAnswer;

const DIVIDER_WIDTH: usize = 60;

/// Print the answer about to be sent
pub fn show_answer(answer: &ResolvedAnswer, media_url: Option<&str>) {
    match answer {
        ResolvedAnswer::Text(body) => {
            println!("{}{}", label("Send to Twilio:").white(), body.blue());
        }
        ResolvedAnswer::Image => {
            println!(
                "{}{}",
                label("Send to Twilio:").white(),
                "Sending image...".blue()
            );
            if let Some(url) = media_url {
                println!("{}{}", label("Image URL:").magenta(), url.cyan());
            }
        }
    }
}

/// Print the next prompt and any media links
pub fn show_rendered(rendered: &Rendered) {
    show_question(&rendered.prompt);
    for url in &rendered.media_urls {
        println!("{}{}", label("Media URL:").magenta(), url.yellow());
    }
}

/// Print a prompt received from the endpoint
pub fn show_question(text: &str) {
    println!("{}{}", label("Next Question:").white(), text.red());
}

fn label(name: &str) -> String {
    format!("{:<18}", name)
}

/// Separate one exchange from the next
pub fn divider() {
    println!("{}", "-".repeat(DIVIDER_WIDTH).yellow().bold());
}
