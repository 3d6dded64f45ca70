// ndeftag/src/session/controller.rs

//! The tag-session state machine: connect -> {read | write | format} ->
//! disconnect, with the raw-memory bootstrap fallback for blank chips whose
//! `format` is rejected.

use std::sync::Arc;

use log::{debug, warn};

use crate::config::{ConfigStore, Configuration};
use crate::constants::{BOOTSTRAP_CAPABILITY_CONTAINER, BOOTSTRAP_EMPTY_NDEF_TLV};
use crate::ndef::{message, NdefRecord};
use crate::probe;
use crate::session::events::{Event, EventRegistry, SubscriberId};
use crate::session::radio::{NullRadioSource, RadioStateSource, RadioWatch};
use crate::tag::TagHandle;
use crate::tag_info::TagInfo;
use crate::types::SessionState;
use crate::{Error, Result};

/// Sole owner of the physical tag handle. All operations take `&mut self`;
/// discovery events and API calls must arrive on a single control thread or
/// be serialized by the caller.
pub struct SessionController {
    state: SessionState,
    current: Option<Box<dyn TagHandle>>,
    config: Arc<ConfigStore>,
    events: EventRegistry,
    radio: RadioWatch,
    is_listening: bool,
    is_writing: bool,
    is_formatting: bool,
}

impl SessionController {
    /// Controller without radio-state support (see [`NullRadioSource`]).
    pub fn new(config: Arc<ConfigStore>) -> Self {
        Self::with_radio_source(config, Box::new(NullRadioSource))
    }

    /// Controller wired to a platform radio-state source.
    pub fn with_radio_source(config: Arc<ConfigStore>, source: Box<dyn RadioStateSource>) -> Self {
        Self {
            state: SessionState::Idle,
            current: None,
            config,
            events: EventRegistry::new(),
            radio: RadioWatch::new(source),
            is_listening: false,
            is_writing: false,
            is_formatting: false,
        }
    }

    /// Current state of the session state machine.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether tag discovery is active.
    pub fn is_listening(&self) -> bool {
        self.is_listening
    }

    /// Whether write mode is armed.
    pub fn is_publishing(&self) -> bool {
        self.is_writing
    }

    /// Snapshot of the current configuration.
    pub fn configuration(&self) -> Configuration {
        self.config.get()
    }

    /// Merge a configuration update (see [`Configuration::update`]).
    pub fn set_configuration(&self, configuration: Configuration) {
        self.config.set(configuration);
    }

    // ---- notifications ----

    pub fn subscribe(&mut self, callback: impl FnMut(&Event) + 'static) -> SubscriberId {
        self.events.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Drop every notification subscriber at once.
    pub fn remove_all_subscribers(&mut self) {
        self.events.clear();
    }

    /// Watch debounced radio enabled/disabled transitions. The underlying
    /// platform subscription is acquired on the first watcher and released
    /// when the last one leaves.
    pub fn watch_radio(&mut self, callback: impl FnMut(bool) + 'static) -> Result<SubscriberId> {
        self.radio.subscribe(callback)
    }

    pub fn unwatch_radio(&mut self, id: SubscriberId) -> bool {
        self.radio.unsubscribe(id)
    }

    /// Entry point for the platform's debounced radio-state delivery.
    pub fn notify_radio_state(&mut self, enabled: bool) {
        self.radio.notify(enabled);
        self.events.emit(&Event::RadioStatusChanged(enabled));
    }

    // ---- listening / publishing ----

    /// Idempotent: starting while already listening only re-announces the
    /// status, it does not stack registrations.
    pub fn start_listening(&mut self) {
        self.is_listening = true;
        self.events.emit(&Event::ListeningStatusChanged(true));
    }

    pub fn stop_listening(&mut self) {
        self.disable_publishing();
        self.is_listening = false;
        self.events.emit(&Event::ListeningStatusChanged(false));
    }

    /// Arm write mode; `format_mode` arms clearing instead of writing.
    pub fn start_publishing(&mut self, format_mode: bool) {
        self.is_writing = true;
        self.is_formatting = format_mode;
    }

    pub fn stop_publishing(&mut self) {
        self.disable_publishing();
    }

    /// Forcibly return to Idle, releasing any held handle. Used when
    /// listening stops while a write is armed but no tag was discovered.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.current.as_mut() {
            Self::close_technologies(handle.as_mut(), "cancel");
        }
        self.current = None;
        self.state = SessionState::Idle;
        self.disable_publishing();
    }

    // ---- tag operations ----

    /// Take ownership of a discovered tag. While publishing is armed this
    /// raises `TagDiscovered` and stays Connected awaiting `write`/`clear`;
    /// otherwise it proceeds directly to the read path and ends Idle.
    ///
    /// A second discovery while a handle is held fails with `SessionBusy`
    /// and leaves the existing handle untouched.
    pub fn on_tag_discovered(&mut self, handle: Box<dyn TagHandle>) -> Result<TagInfo> {
        if self.current.is_some() {
            return Err(Error::SessionBusy);
        }
        self.current = Some(handle);
        self.state = SessionState::Connected;

        let info = match self.current.as_mut() {
            Some(handle) => probe::probe(handle.as_mut()),
            None => return Err(Error::MissingTag),
        };
        debug!("tag discovered: {} (supported: {})", info.id, info.is_supported);

        if self.is_writing {
            self.events
                .emit(&Event::TagDiscovered(info.clone(), self.is_formatting));
            Ok(info)
        } else {
            self.read_tag()
        }
    }

    /// Read the held tag's message and raise `MessageReceived`. The handle
    /// is released and the session returns to Idle on every exit path.
    pub fn read_tag(&mut self) -> Result<TagInfo> {
        self.require_connected()?;
        self.state = SessionState::Reading;

        let mut connected = false;
        let result = self.do_read(&mut connected);
        self.finish_session(connected, result.as_ref().err());
        result
    }

    /// Write `tag_info`'s records to the held tag, optionally locking it
    /// permanently afterwards (best-effort; a failed lock does not roll the
    /// write back). The handle is released and the session returns to Idle
    /// on every exit path, with `TagDisconnected` raised exactly once per
    /// connect.
    pub fn write(&mut self, tag_info: Option<&TagInfo>, make_read_only: bool) -> Result<TagInfo> {
        self.write_or_clear(tag_info, false, make_read_only)
    }

    /// `write` with the canonical Empty-record message substituted for the
    /// caller-supplied records.
    pub fn clear(&mut self, tag_info: Option<&TagInfo>) -> Result<TagInfo> {
        self.write_or_clear(tag_info, true, false)
    }

    // ---- internals ----

    fn require_connected(&self) -> Result<()> {
        if self.current.is_none() {
            return Err(Error::MissingTag);
        }
        if self.state != SessionState::Connected {
            return Err(Error::InvalidState {
                expected: SessionState::Connected,
                actual: self.state,
            });
        }
        Ok(())
    }

    fn disable_publishing(&mut self) {
        self.is_writing = false;
        self.is_formatting = false;
    }

    fn write_or_clear(
        &mut self,
        tag_info: Option<&TagInfo>,
        clear: bool,
        make_read_only: bool,
    ) -> Result<TagInfo> {
        self.require_connected()?;
        let info = match tag_info {
            Some(info) => info,
            None => {
                let err = Error::MissingTagInfo;
                self.finish_session(false, Some(&err));
                return Err(err);
            }
        };
        let records = if clear {
            message::empty_message()
        } else {
            info.records.clone()
        };

        let has_ndef = self.current.as_ref().is_some_and(|h| h.has_ndef());
        let formatable = self
            .current
            .as_ref()
            .is_some_and(|h| h.is_ndef_formatable());

        self.state = if has_ndef {
            SessionState::Writing
        } else {
            SessionState::Formatting
        };

        let mut connected = false;
        let result = if has_ndef {
            self.do_direct_write(&records, clear, make_read_only, &mut connected)
        } else if formatable {
            self.do_format(&records, make_read_only, &mut connected)
        } else {
            Err(Error::NotCompliantTag)
        };
        self.finish_session(connected, result.as_ref().err());
        result
    }

    /// Path 1: the tag already exposes NDEF.
    fn do_direct_write(
        &mut self,
        records: &[NdefRecord],
        clear: bool,
        make_read_only: bool,
        connected: &mut bool,
    ) -> Result<TagInfo> {
        let cfg = self.config.get();
        let handle = self.current.as_mut().ok_or(Error::MissingTag)?.as_mut();

        let ndef = handle.ndef().ok_or(Error::NotCompliantTag)?;
        if !ndef.is_writable() {
            return Err(Error::ReadOnlyTag);
        }
        // Capacity is checked during build, before anything reaches the tag.
        let bytes = message::build(records, &cfg.default_language_code, Some(ndef.max_size()))?;

        ndef.connect().map_err(|_| Error::MissingTag)?;
        *connected = true;
        self.events.emit(&Event::TagConnected);

        ndef.write_message(&bytes)?;
        if !clear && make_read_only {
            if ndef.can_make_read_only() {
                if let Err(err) = ndef.make_read_only() {
                    warn!("cannot lock tag: {err}");
                }
            } else {
                warn!("cannot lock tag: tag does not support locking");
            }
        }

        let fresh = Self::fresh_info(handle, &bytes)?;
        self.events.emit(&Event::MessagePublished(fresh.clone()));
        Ok(fresh)
    }

    /// Path 2: no NDEF, but the formatable marker is advertised.
    fn do_format(
        &mut self,
        records: &[NdefRecord],
        make_read_only: bool,
        connected: &mut bool,
    ) -> Result<TagInfo> {
        let cfg = self.config.get();
        let handle = self.current.as_mut().ok_or(Error::MissingTag)?.as_mut();
        let bytes = message::build(records, &cfg.default_language_code, None)?;

        // The marker can be advertised while the technology is unavailable.
        let formatable = handle.formatable().ok_or(Error::NotCompliantTag)?;
        formatable.connect().map_err(|_| Error::MissingTag)?;
        *connected = true;
        self.events.emit(&Event::TagConnected);

        let format_result = if make_read_only {
            formatable.format_read_only(&bytes)
        } else {
            formatable.format(&bytes)
        };

        match format_result {
            Ok(()) => {
                if let Err(err) = formatable.close() {
                    debug!("format: close failed: {err}");
                }
            }
            Err(Error::TagLost) => return Err(Error::TagLost),
            Err(err) => {
                // Known to fail on some chip families even when the tag is
                // fine. Retry once through the raw-memory bootstrap.
                warn!("format rejected, attempting raw-memory bootstrap: {err}");
                Self::bootstrap_write(handle, &bytes, make_read_only, err)?;
            }
        }

        let fresh = Self::fresh_info(handle, &bytes)?;
        self.events.emit(&Event::MessagePublished(fresh.clone()));
        Ok(fresh)
    }

    /// Manufacturer bootstrap for blank chips: initialize a capability
    /// container and an empty NDEF placeholder through raw memory access,
    /// then write the real message through the reacquired NDEF technology.
    /// Steps before the final write are best-effort; the final write is not.
    fn bootstrap_write(
        handle: &mut dyn TagHandle,
        bytes: &[u8],
        make_read_only: bool,
        original: Error,
    ) -> Result<()> {
        if let Some(formatable) = handle.formatable() {
            if let Err(err) = formatable.close() {
                debug!("bootstrap: formatable close failed: {err}");
            }
        }

        let raw = handle.raw_memory().ok_or_else(|| {
            Error::Write(format!(
                "format failed and tag exposes no raw memory access: {original}"
            ))
        })?;
        if let Err(err) = raw.connect() {
            warn!("bootstrap: raw connect failed: {err}");
        }
        for block in [
            BOOTSTRAP_CAPABILITY_CONTAINER.as_slice(),
            BOOTSTRAP_EMPTY_NDEF_TLV.as_slice(),
        ] {
            if let Err(err) = raw.transceive(block) {
                warn!("bootstrap: block write failed: {err}");
            }
        }
        if let Err(err) = raw.close() {
            debug!("bootstrap: raw close failed: {err}");
        }

        let ndef = handle.ndef().ok_or_else(|| {
            Error::Write("tag exposes no ndef technology after bootstrap".to_string())
        })?;
        ndef.connect()
            .map_err(|err| Error::Write(format!("reconnect after bootstrap failed: {err}")))?;
        ndef.write_message(bytes)?;
        if make_read_only {
            if let Err(err) = ndef.make_read_only() {
                warn!("cannot lock tag: {err}");
            }
        }
        if let Err(err) = ndef.close() {
            debug!("bootstrap: ndef close failed: {err}");
        }
        Ok(())
    }

    /// Close whichever technologies are still connected. Errors are logged,
    /// not surfaced: the handle is being released either way.
    fn close_technologies(handle: &mut dyn TagHandle, context: &str) {
        if let Some(ndef) = handle.ndef() {
            if ndef.is_connected() {
                if let Err(err) = ndef.close() {
                    debug!("{context}: ndef close failed: {err}");
                }
            }
        }
        if let Some(formatable) = handle.formatable() {
            if formatable.is_connected() {
                if let Err(err) = formatable.close() {
                    debug!("{context}: formatable close failed: {err}");
                }
            }
        }
    }

    /// Fresh post-write snapshot carrying the records just written.
    fn fresh_info(handle: &mut dyn TagHandle, bytes: &[u8]) -> Result<TagInfo> {
        let id = handle.id();
        let formatable = handle.is_ndef_formatable();
        let mut info = TagInfo::new(id, handle.has_ndef());
        info.is_ndef_formatable = formatable;
        if let Some(ndef) = handle.ndef() {
            info.capacity_bytes = ndef.max_size();
            info.is_writable = ndef.is_writable();
        }
        info.records = message::parse(bytes)?;
        Ok(info)
    }

    fn do_read(&mut self, connected: &mut bool) -> Result<TagInfo> {
        let handle = self.current.as_mut().ok_or(Error::MissingTag)?.as_mut();

        let mut info = TagInfo::new(handle.id(), handle.has_ndef());
        info.is_ndef_formatable = handle.is_ndef_formatable();

        let ndef = handle.ndef().ok_or_else(|| {
            Error::UnsupportedTag("tag exposes no ndef technology".to_string())
        })?;
        ndef.connect().map_err(|_| Error::MissingTag)?;
        *connected = true;
        self.events.emit(&Event::TagConnected);

        info.capacity_bytes = ndef.max_size();
        info.is_writable = ndef.is_writable();
        let bytes = match ndef.cached_message() {
            Some(bytes) => bytes,
            None => ndef.read_message()?,
        };
        info.records = message::parse(&bytes)?;

        self.events.emit(&Event::MessageReceived(info.clone()));
        Ok(info)
    }

    /// Release the handle and restore Idle. Runs on every exit path,
    /// success or failure; `TagDisconnected` fires once per connect.
    fn finish_session(&mut self, connected: bool, error: Option<&Error>) {
        if let Some(handle) = self.current.as_mut() {
            Self::close_technologies(handle.as_mut(), "session cleanup");
        }
        self.current = None;
        self.state = SessionState::Idle;

        if let Some(err) = error {
            let cfg = self.config.get();
            warn!("tag session failed: {}", cfg.message_for(err));
            self.disable_publishing();
        }
        if connected {
            self.events.emit(&Event::TagDisconnected);
        }
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.state)
            .field("holds_tag", &self.current.is_some())
            .field("is_listening", &self.is_listening)
            .field("is_writing", &self.is_writing)
            .finish()
    }
}
