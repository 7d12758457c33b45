//! Contact form page.

use tracing::info;

use crate::assertion::expect;
use crate::config::{ContactMessage, SiteConfig};
use crate::locator::{Locator, Selector};
use crate::page::PageObject;
use crate::registry::LocatorRegistry;
use crate::result::ComprobarResult;
use crate::session::Session;

/// Locators for the contact form and its validation messages
#[derive(Debug, Clone)]
pub struct ContactLocators {
    nav_contact: Locator,
    first_name: Locator,
    last_name: Locator,
    email: Locator,
    subject: Locator,
    message: Locator,
    submit: Locator,
    first_name_error: Locator,
    last_name_error: Locator,
    email_error: Locator,
    subject_error: Locator,
    message_error: Locator,
    success_banner: Locator,
}

impl ContactLocators {
    /// Build the fixed mapping
    #[must_use]
    pub fn new() -> Self {
        Self {
            nav_contact: Locator::test_id("nav-contact"),
            first_name: Locator::test_id("first-name"),
            last_name: Locator::test_id("last-name"),
            email: Locator::test_id("email"),
            subject: Locator::test_id("subject"),
            message: Locator::test_id("message"),
            submit: Locator::test_id("contact-submit"),
            first_name_error: Locator::from_selector(Selector::text("First name is required")),
            last_name_error: Locator::from_selector(Selector::text("Last name is required")),
            email_error: Locator::from_selector(Selector::text("Email is required")),
            subject_error: Locator::from_selector(Selector::text("Subject is required")),
            message_error: Locator::from_selector(Selector::text("Message is required")),
            success_banner: Locator::from_selector(Selector::text("Thanks for your message!")),
        }
    }

    fn required_errors(&self) -> [&Locator; 5] {
        [
            &self.first_name_error,
            &self.last_name_error,
            &self.email_error,
            &self.subject_error,
            &self.message_error,
        ]
    }
}

impl Default for ContactLocators {
    fn default() -> Self {
        Self::new()
    }
}

impl LocatorRegistry for ContactLocators {
    fn page_name(&self) -> &'static str {
        "contact"
    }

    fn entries(&self) -> Vec<(&'static str, &Locator)> {
        vec![
            ("nav-contact", &self.nav_contact),
            ("first-name", &self.first_name),
            ("last-name", &self.last_name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
            ("submit", &self.submit),
            ("first-name-error", &self.first_name_error),
            ("last-name-error", &self.last_name_error),
            ("email-error", &self.email_error),
            ("subject-error", &self.subject_error),
            ("message-error", &self.message_error),
            ("success-banner", &self.success_banner),
        ]
    }
}

/// Page object for the contact form
#[derive(Debug)]
pub struct ContactPage<'a> {
    session: &'a Session,
    site: SiteConfig,
    locators: ContactLocators,
}

impl<'a> ContactPage<'a> {
    /// Bind to a session and site fixture
    #[must_use]
    pub fn new(session: &'a Session, site: SiteConfig) -> Self {
        Self {
            session,
            site,
            locators: ContactLocators::new(),
        }
    }

    /// Open the contact page via the nav link and wait for the form
    pub async fn open(&self) -> ComprobarResult<()> {
        info!("open contact page");
        self.session.goto(&self.site.home_url()).await?;
        self.session.click(&self.locators.nav_contact).await?;
        expect(self.session, &self.locators.first_name)
            .to_be_visible()
            .await
    }

    /// Fill the first name field
    pub async fn fill_first_name(&self, value: &str) -> ComprobarResult<()> {
        self.session.fill(&self.locators.first_name, value).await
    }

    /// Fill the last name field
    pub async fn fill_last_name(&self, value: &str) -> ComprobarResult<()> {
        self.session.fill(&self.locators.last_name, value).await
    }

    /// Fill the email field
    pub async fn fill_email(&self, value: &str) -> ComprobarResult<()> {
        self.session.fill(&self.locators.email, value).await
    }

    /// Pick a subject option by value
    pub async fn select_subject(&self, value: &str) -> ComprobarResult<()> {
        self.session.select_option(&self.locators.subject, value).await
    }

    /// Fill the message body
    pub async fn fill_message(&self, value: &str) -> ComprobarResult<()> {
        self.session.fill(&self.locators.message, value).await
    }

    /// Fill every field from a message fixture
    pub async fn fill_complete_form(&self, message: &ContactMessage) -> ComprobarResult<()> {
        self.fill_first_name(&message.first_name).await?;
        self.fill_last_name(&message.last_name).await?;
        self.fill_email(&message.email).await?;
        self.select_subject(&message.subject).await?;
        self.fill_message(&message.message).await
    }

    /// Submit the form
    pub async fn submit(&self) -> ComprobarResult<()> {
        self.session.click(&self.locators.submit).await
    }

    /// All five required-field errors are shown
    pub async fn expect_all_required_errors(&self) -> ComprobarResult<()> {
        for locator in self.locators.required_errors() {
            expect(self.session, locator).to_be_visible().await?;
        }
        Ok(())
    }

    /// No required-field error is shown
    pub async fn expect_no_errors(&self) -> ComprobarResult<()> {
        for locator in self.locators.required_errors() {
            expect(self.session, locator).to_be_hidden().await?;
        }
        Ok(())
    }

    /// The confirmation banner is shown
    pub async fn expect_success(&self) -> ComprobarResult<()> {
        expect(self.session, &self.locators.success_banner)
            .to_be_visible()
            .await
    }

    /// The confirmation banner is absent
    pub async fn expect_no_success(&self) -> ComprobarResult<()> {
        expect(self.session, &self.locators.success_banner)
            .to_be_hidden()
            .await
    }
}

impl PageObject for ContactPage<'_> {
    fn url_pattern(&self) -> &str {
        "**/contact"
    }

    fn registry(&self) -> &dyn LocatorRegistry {
        &self.locators
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockElement};
    use crate::session::SessionOptions;
    use std::time::Duration;

    fn session(driver: MockDriver) -> Session {
        Session::with_options(
            driver,
            SessionOptions::default().with_action_timeout(Duration::from_millis(150)),
        )
    }

    fn form_driver() -> MockDriver {
        MockDriver::new()
            .with_element(&Selector::test_id("nav-contact"), MockElement::text("Contact"))
            .with_element(&Selector::test_id("first-name"), MockElement::value(""))
            .with_element(&Selector::test_id("last-name"), MockElement::value(""))
            .with_element(&Selector::test_id("email"), MockElement::value(""))
            .with_element(&Selector::test_id("subject"), MockElement::value(""))
            .with_element(&Selector::test_id("message"), MockElement::value(""))
            .with_element(
                &Selector::test_id("contact-submit"),
                MockElement::text("Send"),
            )
    }

    #[tokio::test]
    async fn test_fill_complete_form_touches_every_field() {
        let session = session(form_driver());
        let contact = ContactPage::new(&session, SiteConfig::default());
        let message = ContactMessage::valid();
        contact.fill_complete_form(&message).await.unwrap();

        let first = session
            .input_value(&Locator::test_id("first-name"))
            .await
            .unwrap();
        assert_eq!(first.as_deref(), Some("Jane"));
        let subject = session
            .input_value(&Locator::test_id("subject"))
            .await
            .unwrap();
        assert_eq!(subject.as_deref(), Some("webmaster"));
        let body = session
            .input_value(&Locator::test_id("message"))
            .await
            .unwrap();
        assert_eq!(body, Some(message.message.clone()));
    }

    #[tokio::test]
    async fn test_required_errors_when_present() {
        let mut driver = form_driver();
        for text in [
            "First name is required",
            "Last name is required",
            "Email is required",
            "Subject is required",
            "Message is required",
        ] {
            driver.set_element(&Selector::text(text), MockElement::text(text));
        }
        let session = session(driver);
        let contact = ContactPage::new(&session, SiteConfig::default());
        contact.expect_all_required_errors().await.unwrap();
    }

    #[tokio::test]
    async fn test_no_errors_on_pristine_form() {
        let session = session(form_driver());
        let contact = ContactPage::new(&session, SiteConfig::default());
        contact.expect_no_errors().await.unwrap();
        contact.expect_no_success().await.unwrap();
    }

    #[test]
    fn test_registry_lists_error_locators() {
        let locators = ContactLocators::new();
        assert_eq!(locators.page_name(), "contact");
        assert_eq!(locators.entries().len(), 13);
        assert!(locators.get("success-banner").is_some());
    }
}
