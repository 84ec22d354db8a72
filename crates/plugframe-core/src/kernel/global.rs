//! Process-wide state shared by every framework instance.
//!
//! Holds the framework id counter and the set of instances that are still
//! alive. The lock is only taken for these few bookkeeping operations and is
//! never held across calls into storage, loaders or activators.
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, OnceLock};

#[derive(Debug)]
struct GlobalState {
    next_id: u64,
    live: BTreeSet<u64>,
}

#[derive(Debug)]
struct FrameworkGlobals {
    state: Mutex<GlobalState>,
}

static GLOBALS: OnceLock<FrameworkGlobals> = OnceLock::new();

fn lock() -> MutexGuard<'static, GlobalState> {
    let globals = GLOBALS.get_or_init(|| FrameworkGlobals {
        state: Mutex::new(GlobalState {
            next_id: 1,
            live: BTreeSet::new(),
        }),
    });
    // A panic while holding the lock cannot leave the counter inconsistent
    globals.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Hands out the next framework id and marks it live.
///
/// Ids start at 1, strictly increase and are never reused in a process.
pub fn allocate_id() -> u64 {
    let mut state = lock();
    let id = state.next_id;
    state.next_id += 1;
    state.live.insert(id);
    id
}

/// Marks a framework id as no longer live. Unknown ids are ignored.
pub fn release(id: u64) -> bool {
    lock().live.remove(&id)
}

/// Ids of framework instances that have not been dropped yet, ascending
pub fn live_instances() -> Vec<u64> {
    lock().live.iter().copied().collect()
}
