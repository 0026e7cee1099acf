//! Bounded conversation memory

use std::collections::VecDeque;

use crate::models::ChatMessage;

/// Messages kept per conversation
pub const HISTORY_CAPACITY: usize = 5;

/// Ring buffer of the most recent turns. Pushing into a full buffer evicts
/// the oldest message.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    messages: VecDeque<ChatMessage>,
    capacity: usize,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl ConversationHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// Retained messages, oldest first
    pub fn window(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oldest_message_is_evicted() {
        let mut history = ConversationHistory::new();
        for i in 0..7 {
            history.push(ChatMessage::user(format!("message {i}")));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        let contents: Vec<_> = history.window().map(|m| m.content.as_str()).collect();
        assert_eq!(
            contents,
            vec!["message 2", "message 3", "message 4", "message 5", "message 6"]
        );
    }

    #[test]
    fn test_clear() {
        let mut history = ConversationHistory::with_capacity(2);
        history.push(ChatMessage::user("hi"));
        history.push(ChatMessage::assistant("hello"));
        history.push(ChatMessage::user("again"));
        assert_eq!(history.messages()[0], ChatMessage::assistant("hello"));
        history.clear();
        assert!(history.is_empty());
    }
}
