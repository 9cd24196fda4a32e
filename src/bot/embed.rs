//! Embed templates for command replies.

use serenity::all::{Colour, CreateEmbed};
use url::Url;

use crate::{error::AppError, service::verification::CHALLENGE_TTL_MINUTES};

pub fn success(text: &str) -> CreateEmbed {
    CreateEmbed::new()
        .colour(Colour::DARK_GREEN)
        .description(format!("✅ {}", text))
}

pub fn warning(text: &str) -> CreateEmbed {
    CreateEmbed::new()
        .colour(Colour::GOLD)
        .description(format!("⚠️ {}", text))
}

pub fn fatal(text: &str) -> CreateEmbed {
    CreateEmbed::new()
        .colour(Colour::RED)
        .description(format!("❌ {}", text))
}

/// Reply carrying a fresh verification link.
pub fn verification_link(url: &Url) -> CreateEmbed {
    CreateEmbed::new()
        .title("Koble Galtinnbrukeren din til Discord")
        .colour(Colour::ORANGE)
        .description(format!(
            "Klikk på lenken under for å koble Galtinnbrukeren din til Discord\n\n{}\n\n\
             Du har {} minutter på deg til å fullføre verifikasjonen.",
            url, CHALLENGE_TTL_MINUTES
        ))
}

/// Reply for a failed command.
///
/// Expected outcomes such as an already linked account are warnings; other
/// failures are logged and shown as a generic error.
pub fn from_error(err: &AppError) -> CreateEmbed {
    match err {
        AppError::VerificationErr(_) => warning(err.user_message()),
        _ => fatal(err.user_message()),
    }
}
