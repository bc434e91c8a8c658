use crate::db::DbError;
use crate::idea::{Idea, IdeaDraft};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Results sent from store tasks back to the UI loop.
#[derive(Debug)]
pub enum StoreEvent {
    /// A list request finished.
    IdeasLoaded {
        generation: u64,
        result: Result<Vec<Idea>, DbError>,
    },

    /// An insert finished. Carries the values that were submitted.
    Inserted {
        generation: u64,
        draft: IdeaDraft,
        result: Result<Idea, DbError>,
    },

    /// A get-by-id request finished.
    DetailLoaded {
        generation: u64,
        id: i64,
        result: Result<Idea, DbError>,
    },
}

/// Channel pair connecting store tasks to the UI loop.
pub struct StoreChannels {
    pub tx: UnboundedSender<StoreEvent>,
    pub rx: UnboundedReceiver<StoreEvent>,
}

impl StoreChannels {
    pub fn new() -> Self {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for StoreChannels {
    fn default() -> Self {
        Self::new()
    }
}
