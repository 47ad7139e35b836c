use tera::{Context, Tera};
use tracing::info;

pub const CONFIRMATION_HTML: &str = "email/waitlist_confirmation.html";
pub const CONFIRMATION_TEXT: &str = "email/waitlist_confirmation.txt";

/// Holds the compiled email templates. They are embedded into the binary,
/// so rendering does not depend on the working directory.
#[derive(Debug)]
pub struct TemplateManager {
    tera: Tera,
}

impl TemplateManager {
    pub fn init() -> Result<Self, tera::Error> {
        info!(
            "{:<20} - Initializing the Template manager",
            "templ manager"
        );
        let mut tera = Tera::default();
        tera.add_raw_templates([
            (
                CONFIRMATION_HTML,
                include_str!("../templates/email/waitlist_confirmation.html"),
            ),
            (
                CONFIRMATION_TEXT,
                include_str!("../templates/email/waitlist_confirmation.txt"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Renders the html and the plain text version of the waitlist confirmation email.
    pub fn render_confirmation(&self, subscriber_name: &str) -> Result<(String, String), tera::Error> {
        let mut ctx = Context::new();
        ctx.insert("subscriber_name", subscriber_name);

        let html = self.tera.render(CONFIRMATION_HTML, &ctx)?;
        let text = self.tera.render(CONFIRMATION_TEXT, &ctx)?;
        Ok((html, text))
    }
}
