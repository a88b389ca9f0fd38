use crate::domain::model::OfficeRecord;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Ticket handed out when a resolution for the slot starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SlotTicket(u64);

/// Display area for one office. The latest started resolution wins; results
/// of older in-flight resolutions are dropped when they arrive.
#[derive(Debug, Clone, Default)]
pub struct OfficeSlot {
    latest: Arc<AtomicU64>,
    current: Arc<Mutex<Option<(SlotTicket, OfficeRecord)>>>,
}

impl OfficeSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> SlotTicket {
        SlotTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Stores the office unless a newer ticket has been issued. Returns whether it was applied.
    pub fn apply(&self, ticket: SlotTicket, office: OfficeRecord) -> bool {
        if ticket.0 != self.latest.load(Ordering::Acquire) {
            tracing::debug!("Dropping stale office result for ticket {}", ticket.0);
            return false;
        }

        let mut current = match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // 較舊的 ticket 不可覆蓋已套用的較新結果
        if matches!(current.as_ref(), Some((applied, _)) if *applied > ticket) {
            return false;
        }
        *current = Some((ticket, office));
        true
    }

    pub fn current(&self) -> Option<OfficeRecord> {
        let current = match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        current.as_ref().map(|(_, office)| office.clone())
    }
}
