//! Contact form acceptance scenarios.

use std::sync::Arc;

use crate::config::{ContactMessage, SiteConfig};
use crate::pages::ContactPage;
use crate::runner::Suite;
use crate::scenario::Scenario;
use crate::session::Session;

/// The contact suite against the given site
#[must_use]
pub fn contact_suite(site: &SiteConfig) -> Suite {
    Suite::new("contact")
        .scenario(empty_submission_is_rejected(site))
        .scenario(valid_submission_succeeds(site))
        .scenario(corrected_submission_recovers(site))
}

// Same shape as the cart suite's step macro, bound to ContactPage.
macro_rules! contact_step {
    ($site:expr, |$page:ident| $body:block) => {{
        let site = $site.clone();
        move |session: Arc<Session>| {
            let site = site.clone();
            async move {
                let $page = ContactPage::new(&session, site);
                $body
            }
        }
    }};
}

fn empty_submission_is_rejected(site: &SiteConfig) -> Scenario {
    Scenario::new("empty submission shows every required-field error")
        .step(
            "open contact form",
            contact_step!(site, |contact| { contact.open().await }),
        )
        .step(
            "submit without filling anything",
            contact_step!(site, |contact| { contact.submit().await }),
        )
        .step(
            "all five required errors appear",
            contact_step!(site, |contact| {
                contact.expect_all_required_errors().await
            }),
        )
        .step(
            "no success message",
            contact_step!(site, |contact| { contact.expect_no_success().await }),
        )
}

fn valid_submission_succeeds(site: &SiteConfig) -> Scenario {
    Scenario::new("valid submission is confirmed without errors")
        .step(
            "open contact form",
            contact_step!(site, |contact| { contact.open().await }),
        )
        .step(
            "fill every field",
            contact_step!(site, |contact| {
                contact.fill_complete_form(&ContactMessage::valid()).await
            }),
        )
        .step(
            "submit",
            contact_step!(site, |contact| { contact.submit().await }),
        )
        .step(
            "confirmation appears",
            contact_step!(site, |contact| { contact.expect_success().await }),
        )
        .step(
            "no field errors remain",
            contact_step!(site, |contact| { contact.expect_no_errors().await }),
        )
}

fn corrected_submission_recovers(site: &SiteConfig) -> Scenario {
    Scenario::new("correcting an empty submission clears the errors")
        .step(
            "open contact form",
            contact_step!(site, |contact| { contact.open().await }),
        )
        .step(
            "submit empty, errors appear",
            contact_step!(site, |contact| {
                contact.submit().await?;
                contact.expect_all_required_errors().await
            }),
        )
        .step(
            "fill every field and resubmit",
            contact_step!(site, |contact| {
                contact.fill_complete_form(&ContactMessage::valid()).await?;
                contact.submit().await
            }),
        )
        .step(
            "errors are gone and confirmation appears",
            contact_step!(site, |contact| {
                contact.expect_no_errors().await?;
                contact.expect_success().await
            }),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suite_shape() {
        let suite = contact_suite(&SiteConfig::default());
        assert_eq!(suite.name(), "contact");
        assert_eq!(suite.len(), 3);
    }

    #[test]
    fn test_recovery_scenario_steps() {
        let suite = contact_suite(&SiteConfig::default());
        let recovery = &suite.scenarios()[2];
        assert_eq!(recovery.len(), 4);
        assert_eq!(recovery.step_names()[0], "open contact form");
    }
}
