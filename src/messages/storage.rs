use super::types::Message;
use parking_lot::RwLock;
use std::sync::Arc;

/// Session-scoped cap; old entries are dropped, nothing is persisted
const MAX_ENTRIES: usize = 200;

#[derive(Debug, Clone)]
pub struct MessageLog {
    messages: Arc<RwLock<Vec<Message>>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn add(&self, message: Message) {
        let mut messages = self.messages.write();
        if messages.len() >= MAX_ENTRIES {
            messages.remove(0);
        }
        messages.push(message);
    }

    pub fn get_all(&self) -> Vec<Message> {
        self.messages.read().clone()
    }

    /// The most recent entry, if any
    pub fn latest(&self) -> Option<Message> {
        self.messages.read().last().cloned()
    }

    pub fn clear(&self) {
        self.messages.write().clear();
    }

    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::types::{MessageContent, Sender};

    fn text_entry(text: &str) -> Message {
        Message::new(Sender::Assistant, MessageContent::Text(text.to_string()))
    }

    #[test]
    fn test_add_and_latest() {
        let log = MessageLog::new();
        assert!(log.is_empty());
        assert!(log.latest().is_none());

        log.add(text_entry("first"));
        log.add(text_entry("second"));

        assert_eq!(log.len(), 2);
        match log.latest().unwrap().content {
            MessageContent::Text(text) => assert_eq!(text, "second"),
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_clear() {
        let log = MessageLog::new();
        log.add(text_entry("entry"));
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_cap_drops_oldest() {
        let log = MessageLog::new();
        for i in 0..(MAX_ENTRIES + 5) {
            log.add(text_entry(&format!("entry {}", i)));
        }

        assert_eq!(log.len(), MAX_ENTRIES);
        match log.get_all().first().unwrap().content.clone() {
            MessageContent::Text(text) => assert_eq!(text, "entry 5"),
            _ => panic!("Expected text content"),
        }
    }
}
