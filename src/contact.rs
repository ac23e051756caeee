//! "Contact Us" form from the public landing page. Nothing is sent anywhere; the form
//! only validates and acknowledges.

use crate::error::{AppError, AppResult};

pub const CONTACT_THANKS: &str = "Thank you for contacting us! We'll get back to you soon.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub agree: bool,
}

impl ContactForm {
    /// Every text field is required; the terms checkbox is checked last.
    pub fn validate(&self) -> AppResult<()> {
        let fields = [&self.first_name, &self.last_name, &self.email, &self.phone, &self.message];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(AppError::user("incomplete_form", "Please fill in all required fields."));
        }
        if !self.agree {
            return Err(AppError::user("terms_not_accepted", "Please agree to the Terms and Conditions"));
        }
        Ok(())
    }

    pub fn submit(&self) -> AppResult<&'static str> {
        self.validate()?;
        Ok(CONTACT_THANKS)
    }
}
