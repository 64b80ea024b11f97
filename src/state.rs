use std::sync::Mutex;

use crate::config::AppConfig;
use crate::models::Appointment;
use crate::services::messaging::MessagingProvider;
use crate::services::records::RecordKeeper;
use crate::services::scheduling::SlotBook;
use crate::services::sessions::SessionStore;
use crate::services::speech::{SpeechSynthesizer, Transcriber};

pub struct AppState {
    pub config: AppConfig,
    pub sessions: SessionStore,
    /// Every booking made since startup.
    pub appointments: Mutex<Vec<Appointment>>,
    pub slots: Box<dyn SlotBook>,
    pub messaging: Box<dyn MessagingProvider>,
    pub records: Box<dyn RecordKeeper>,
    /// No synthesizer means replies carry no audio.
    pub speech: Option<Box<dyn SpeechSynthesizer>>,
    pub transcriber: Option<Box<dyn Transcriber>>,
}
