//! Recording operator panel.

use crate::{traits::OperatorPanel, types::Tone};
use std::sync::{Arc, Mutex};

/// One output on the panel side channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelOutput {
    Message(String),
    Tone(Tone),
}

/// Operator panel that records messages and tones.
#[derive(Debug, Default)]
pub struct MockPanel {
    outputs: Arc<Mutex<Vec<PanelOutput>>>,
}

impl MockPanel {
    pub fn new() -> (Self, MockPanelHandle) {
        let outputs = Arc::new(Mutex::new(Vec::new()));
        (
            MockPanel {
                outputs: Arc::clone(&outputs),
            },
            MockPanelHandle { outputs },
        )
    }
}

impl OperatorPanel for MockPanel {
    fn show_message(&mut self, message: &str) {
        self.outputs
            .lock()
            .unwrap()
            .push(PanelOutput::Message(message.to_string()));
    }

    fn play_tone(&mut self, tone: Tone) {
        self.outputs.lock().unwrap().push(PanelOutput::Tone(tone));
    }
}

/// Inspection handle for a [`MockPanel`].
#[derive(Debug, Clone)]
pub struct MockPanelHandle {
    outputs: Arc<Mutex<Vec<PanelOutput>>>,
}

impl MockPanelHandle {
    pub fn outputs(&self) -> Vec<PanelOutput> {
        self.outputs.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.outputs
            .lock()
            .unwrap()
            .iter()
            .filter_map(|o| match o {
                PanelOutput::Message(m) => Some(m.clone()),
                PanelOutput::Tone(_) => None,
            })
            .collect()
    }

    pub fn tone_count(&self, tone: Tone) -> usize {
        self.outputs
            .lock()
            .unwrap()
            .iter()
            .filter(|o| matches!(o, PanelOutput::Tone(t) if *t == tone))
            .count()
    }

    pub fn clear(&self) {
        self.outputs.lock().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_messages_and_tones() {
        let (mut panel, handle) = MockPanel::new();
        panel.show_message("PRESENT BADGE");
        panel.play_tone(Tone::Error);

        assert_eq!(handle.messages(), vec!["PRESENT BADGE".to_string()]);
        assert_eq!(handle.tone_count(Tone::Error), 1);
        assert_eq!(handle.tone_count(Tone::Confirm), 0);
    }
}
