// src/core/session.rs
//
// Authenticated browser session against the portal. The roster report is
// rendered client-side, so a plain HTTP GET would return an empty shell;
// we drive a headless Chrome and read the document after render.
//
// One Session = one browser = one pipeline run. Dropping the Session
// (normally or on an early abort) closes the browser.

use std::error::Error;
use std::ffi::OsStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use headless_chrome::{Browser, LaunchOptions, Tab};
use headless_chrome::protocol::cdp::Page;
use headless_chrome::protocol::cdp::types::Event;

use crate::error::ScrapeError;
use crate::params::{
    DIALOG_POLL_MS, DIALOG_WAIT_MS, NAV_TIMEOUT_SECS, PASSWORD_FIELD, USERNAME_FIELD,
};

/// Outcome of waiting for one optional post-login dialog.
/// Timing out in `AwaitingDialog` transitions to `NoDialog`; that is the
/// normal path, not a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogState {
    AwaitingDialog,
    DialogHandled,
    NoDialog,
}

pub struct Session {
    // Keep-alive: the tab's browser. Dropping it kills the Chrome process.
    _browser: Browser,
    tab: Arc<Tab>,
    dialogs_seen: Arc<AtomicUsize>,
}

impl Session {
    /// Log in and leave the tab on the post-login page.
    /// Missing credential fields are fatal: the site markup has changed.
    pub fn login(login_url: &str, username: &str, password: &str) -> Result<Self, Box<dyn Error>> {
        let opts = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .args(vec![OsStr::new("--disable-gpu")])
            .build()?;
        let browser = Browser::new(opts)?;
        let tab = browser.new_tab()?;
        tab.set_default_timeout(Duration::from_secs(NAV_TIMEOUT_SECS));

        // The listener only counts dialog openings; acceptance happens on
        // this thread (see await_dialog).
        let dialogs_seen = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&dialogs_seen);
        tab.add_event_listener(Arc::new(move |event: &Event| {
            if let Event::PageJavascriptDialogOpening(_) = event {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        }))?;

        tab.navigate_to(login_url)?;
        tab.wait_until_navigated()?;

        let user_field = tab
            .wait_for_element(&format!("input[name={USERNAME_FIELD}]"))
            .map_err(|_| ScrapeError::LoginFieldsMissing(s!(USERNAME_FIELD)))?;
        user_field.type_into(username)?;
        let pass_field = tab
            .wait_for_element(&format!("input[name={PASSWORD_FIELD}]"))
            .map_err(|_| ScrapeError::LoginFieldsMissing(s!(PASSWORD_FIELD)))?;
        pass_field.type_into(password)?;
        tab.press_key("Enter")?;

        let session = Self { _browser: browser, tab, dialogs_seen };
        session.acknowledge_dialogs();
        Ok(session)
    }

    /// Navigate the authenticated session to `url` and return the document
    /// HTML *after* client-side rendering.
    pub fn fetch_rendered(&self, url: &str) -> Result<String, Box<dyn Error>> {
        self.tab
            .navigate_to(url)
            .and_then(|t| t.wait_until_navigated())
            .map_err(|e| ScrapeError::Fetch(e.to_string()))?;
        let html = self
            .tab
            .get_content()
            .map_err(|e| ScrapeError::Fetch(e.to_string()))?;
        Ok(html)
    }

    /// Zero, one or two confirmation dialogs may follow the login, each
    /// optional. Absence within the bounded wait means the dialog will not
    /// appear. Errors while accepting are logged and swallowed; dialogs
    /// can never abort a run.
    fn acknowledge_dialogs(&self) {
        let mut handled = 0usize;
        for _ in 0..2 {
            match self.await_dialog(handled, Duration::from_millis(DIALOG_WAIT_MS)) {
                DialogState::DialogHandled => {
                    handled += 1;
                    logf!("Acknowledged post-login dialog {handled}");
                }
                DialogState::NoDialog | DialogState::AwaitingDialog => break,
            }
        }
        if handled == 0 {
            logd!("No post-login dialogs appeared");
        }
    }

    /// Poll for a dialog past the `already_handled` count, bounded by
    /// `wait`, and accept it.
    fn await_dialog(&self, already_handled: usize, wait: Duration) -> DialogState {
        let deadline = Instant::now() + wait;
        loop {
            if self.dialogs_seen.load(Ordering::SeqCst) > already_handled {
                return match self.tab.call_method(Page::HandleJavaScriptDialog {
                    accept: true,
                    prompt_text: None,
                }) {
                    Ok(_) => DialogState::DialogHandled,
                    Err(e) => {
                        loge!("Accepting post-login dialog failed (swallowed): {e}");
                        // The dialog opened; whatever state it is in now,
                        // we move on rather than abort.
                        DialogState::DialogHandled
                    }
                };
            }
            if Instant::now() >= deadline {
                return DialogState::NoDialog;
            }
            thread::sleep(Duration::from_millis(DIALOG_POLL_MS));
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        logd!("Session closed");
    }
}
