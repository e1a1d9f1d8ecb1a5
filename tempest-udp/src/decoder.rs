//! Message classifier and notification dispatch.

use std::fmt;

use serde_json::Value;
use tracing::{debug, trace};

use crate::{
    error::{DecodeError, Result},
    Document, Key, Kind, Store,
};

/// Receiver for "kind observed" notifications.
///
/// The notifier runs synchronously inside [`WeatherFlow::process_message`],
/// after the new document is stored. It gets the kind and a read-only view of
/// the store, where [`Store::current_value`] resolves against that kind.
///
/// Any `FnMut(Kind, &Store) + Send` closure is a notifier; state it captures
/// plays the role of a callback context.
pub trait Notify: Send {
    /// Called once per successfully classified message.
    fn notify(&mut self, kind: Kind, store: &Store);
}

impl<F> Notify for F
where
    F: FnMut(Kind, &Store) + Send,
{
    #[inline]
    fn notify(&mut self, kind: Kind, store: &Store) {
        self(kind, store)
    }
}

/// Decoder for WeatherFlow hub messages.
///
/// Keeps the latest message of each [`Kind`] and notifies at most one
/// registered notifier when a message is classified.
///
/// # Examples
///
/// ```
/// use tempest_udp::{Key, Kind, Store, WeatherFlow};
/// use serde_json::json;
///
/// let mut decoder = WeatherFlow::new();
/// decoder.register_callback(|kind: Kind, store: &Store| {
///     assert_eq!(kind, Kind::Wind);
///     assert_eq!(store.current_value(Key::WindDirection), Some(&json!(128)));
/// });
///
/// let payload = br#"{"serial_number":"SK-00008453","type":"rapid_wind","hub_sn":"HB-00000001","ob":[1493322445,2.3,128]}"#;
/// assert_eq!(decoder.process_message(payload).unwrap(), Kind::Wind);
/// assert_eq!(decoder.get_value(Kind::Wind, Key::WindSpeed), Some(&json!(2.3)));
/// ```
#[derive(Default)]
pub struct WeatherFlow {
    store: Store,
    notifier: Option<Box<dyn Notify>>,
}

impl fmt::Debug for WeatherFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherFlow")
            .field("store", &self.store)
            .field("has_notifier", &self.notifier.is_some())
            .finish()
    }
}

impl WeatherFlow {
    /// Creates a decoder with an empty store and no notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and classifies one raw message.
    ///
    /// On success the message replaces the stored document of its kind and
    /// the notifier (if any) runs before this returns. The payload is only
    /// borrowed for the duration of the call.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::Malformed` if the payload is not valid JSON.
    /// Returns `DecodeError::UnknownKind` if the `type` field is missing,
    /// not a string, or not a known discriminator.
    /// In both cases no state changes and no notification fires.
    pub fn process_message(&mut self, payload: &[u8]) -> Result<Kind> {
        trace!(len = payload.len(), "processing payload");
        let value: Value = serde_json::from_slice(payload).map_err(|err| {
            debug!(error = %err, "rejected malformed payload");
            DecodeError::from(err)
        })?;
        self.process_document(value)
    }

    /// Classifies an already-parsed message.
    ///
    /// Behaves like [`WeatherFlow::process_message`] minus the parse step.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::UnknownKind` if the value is not an object or
    /// its `type` field is not a known discriminator.
    pub fn process_document(&mut self, value: Value) -> Result<Kind> {
        let document = match Document::try_from(value) {
            Ok(document) => document,
            Err(_) => {
                debug!("rejected non-object message");
                return Err(DecodeError::unknown_kind(None));
            }
        };

        let Some(kind) = document.discriminator().and_then(Kind::from_discriminator) else {
            let err = DecodeError::unknown_kind(document.discriminator());
            debug!(error = %err, "rejected message");
            return Err(err);
        };

        debug!(%kind, "classified message");
        self.store.replace(kind, document);
        self.dispatch(kind);
        Ok(kind)
    }

    fn dispatch(&mut self, kind: Kind) {
        self.store.set_current(Some(kind));
        if let Some(notifier) = self.notifier.as_mut() {
            notifier.notify(kind, &self.store);
        }
        self.store.set_current(None);
    }

    /// Registers the notifier, replacing any previous one.
    pub fn register_callback<N>(&mut self, notifier: N)
    where
        N: Notify + 'static,
    {
        self.notifier = Some(Box::new(notifier));
    }

    /// Removes the registered notifier, if any.
    pub fn clear_callback(&mut self) {
        self.notifier = None;
    }

    /// See [`Store::get_value`].
    #[inline]
    pub fn get_value(&self, kind: Kind, key: Key) -> Option<&Value> {
        self.store.get_value(kind, key)
    }

    /// See [`Store::current_value`]. Always `None` outside a notifier.
    #[inline]
    pub fn current_value(&self, key: Key) -> Option<&Value> {
        self.store.current_value(key)
    }

    /// See [`Store::has_object`].
    #[inline]
    pub fn has_object(&self, kind: Kind) -> bool {
        self.store.has_object(kind)
    }

    /// See [`Store::last_document`].
    #[inline]
    pub fn last_document(&self, kind: Kind) -> Document {
        self.store.last_document(kind)
    }

    /// Returns the underlying store.
    #[inline]
    pub fn store(&self) -> &Store {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    use serde_json::json;

    use super::*;

    const RAIN: &[u8] =
        br#"{"serial_number":"SK-00008453","type":"evt_precip","hub_sn":"HB-00000001","evt":[1493322445]}"#;

    #[test]
    fn test_classifies_and_stores() {
        let mut decoder = WeatherFlow::new();
        assert_eq!(decoder.process_message(RAIN).unwrap(), Kind::Rain);
        assert!(decoder.has_object(Kind::Rain));
        assert_eq!(
            decoder.get_value(Kind::Rain, Key::TimeEpoch),
            Some(&json!(1493322445))
        );
    }

    #[test]
    fn test_malformed_payload() {
        let mut decoder = WeatherFlow::new();
        let err = decoder.process_message(br#"{"type":"evt_precip""#).unwrap_err();
        assert!(err.is_malformed());
        assert!(!decoder.has_object(Kind::Rain));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let mut decoder = WeatherFlow::new();
        let err = decoder.process_message(b"{\"type\":\"\xff\"}").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_unknown_discriminators() {
        let mut decoder = WeatherFlow::new();
        let payloads: [&[u8]; 6] = [
            br#"{"type":"light_debug"}"#,
            br#"{"type":""}"#,
            br#"{"type":42}"#,
            br#"{"type":null}"#,
            br#"{"serial_number":"ST-1"}"#,
            br#"["obs_st"]"#,
        ];
        for payload in payloads {
            let err = decoder.process_message(payload).unwrap_err();
            assert!(matches!(err, DecodeError::UnknownKind { .. }), "{:?}", err);
        }
        assert_eq!(decoder.store().kinds().count(), 0);
    }

    #[test]
    fn test_unknown_kind_reports_discriminator() {
        let mut decoder = WeatherFlow::new();
        match decoder.process_message(br#"{"type":"OBS_ST"}"#) {
            Err(DecodeError::UnknownKind { discriminator }) => {
                assert_eq!(discriminator.as_deref(), Some("OBS_ST"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_notifier_sees_current_kind() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut decoder = WeatherFlow::new();
        decoder.register_callback(move |kind: Kind, store: &Store| {
            sink.lock()
                .unwrap()
                .push((kind, store.current_kind(), store.current_value(Key::TimeEpoch).cloned()));
        });

        decoder.process_message(RAIN).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![(Kind::Rain, Some(Kind::Rain), Some(json!(1493322445)))]
        );
        assert_eq!(decoder.store().current_kind(), None);
        assert_eq!(decoder.current_value(Key::TimeEpoch), None);
    }

    #[test]
    fn test_no_notification_on_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut decoder = WeatherFlow::new();
        decoder.register_callback(move |_: Kind, _: &Store| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let _ = decoder.process_message(b"{");
        let _ = decoder.process_message(br#"{"type":"nope"}"#);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        decoder.process_message(RAIN).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_register_replaces_previous() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let mut decoder = WeatherFlow::new();
        let counter = Arc::clone(&first);
        decoder.register_callback(move |_: Kind, _: &Store| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = Arc::clone(&second);
        decoder.register_callback(move |_: Kind, _: &Store| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        decoder.process_message(RAIN).unwrap();
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);

        decoder.clear_callback();
        decoder.process_message(RAIN).unwrap();
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_process_document() {
        let mut decoder = WeatherFlow::new();
        let kind = decoder
            .process_document(json!({"type": "hub_status", "serial_number": "HB-00000001"}))
            .unwrap();
        assert_eq!(kind, Kind::Hub);
        assert_eq!(
            decoder.get_value(Kind::Hub, Key::HubSerialNumber),
            Some(&json!("HB-00000001"))
        );

        assert!(decoder.process_document(json!(17)).is_err());
    }

    #[test]
    fn test_debug_output() {
        let decoder = WeatherFlow::new();
        assert!(format!("{:?}", decoder).contains("has_notifier: false"));
    }
}
