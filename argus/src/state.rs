// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Per-call-site state: what one in-flight call carries from its entry to
//! its exit.

use std::{any::Any, collections::HashMap, fmt};

use log::warn;

use crate::{format_helpers::is_error_return, formatting::FormatState};

/// Number and raw register arguments of a call, as observed at entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawCall {
    pub nr: i64,
    pub args: [u64; 6],
}

impl RawCall {
    pub fn new(nr: i64, args: [u64; 6]) -> Self {
        RawCall { nr, args }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Unseen,
    EnteredPartial,
    ExitedComplete,
    ExitedOnError,
}

type Cleanup = Box<dyn FnOnce(Box<dyn Any + Send>) + Send>;

/// Data a decoder stashed at entry. The cleanup, if any, runs when the
/// payload is dropped without being taken back.
pub struct PrivateData {
    payload: Option<Box<dyn Any + Send>>,
    cleanup: Option<Cleanup>,
}

impl PrivateData {
    fn new(payload: Box<dyn Any + Send>, cleanup: Option<Cleanup>) -> Self {
        PrivateData {
            payload: Some(payload),
            cleanup,
        }
    }
}

impl Drop for PrivateData {
    fn drop(&mut self) {
        if let (Some(payload), Some(cleanup)) = (self.payload.take(), self.cleanup.take()) {
            cleanup(payload);
        }
    }
}

impl fmt::Debug for PrivateData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateData")
            .field("has_cleanup", &self.cleanup.is_some())
            .finish_non_exhaustive()
    }
}

/// One traced call, from entry to exit.
#[derive(Debug)]
pub struct Occurrence {
    tid: u32,
    call: RawCall,
    phase: Phase,
    retval: Option<i64>,
    needs_exit: bool,
    format: Option<FormatState>,
    private: Option<PrivateData>,
}

impl Occurrence {
    pub fn new(tid: u32, call: RawCall) -> Self {
        Occurrence {
            tid,
            call,
            phase: Phase::Unseen,
            retval: None,
            needs_exit: false,
            format: None,
            private: None,
        }
    }

    pub fn tid(&self) -> u32 {
        self.tid
    }

    pub fn call(&self) -> &RawCall {
        &self.call
    }

    pub fn nr(&self) -> i64 {
        self.call.nr
    }

    /// The `n`th raw argument; out of range reads as zero.
    pub fn arg(&self, n: usize) -> u64 {
        self.call.args.get(n).copied().unwrap_or(0)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn retval(&self) -> Option<i64> {
        self.retval
    }

    /// Whether the call has returned an error. False before exit.
    pub fn failed(&self) -> bool {
        self.retval.is_some_and(is_error_return)
    }

    pub(crate) fn enter(&mut self, needs_exit: bool) {
        self.phase = Phase::EnteredPartial;
        self.needs_exit = needs_exit;
    }

    pub(crate) fn needs_exit(&self) -> bool {
        self.needs_exit
    }

    pub(crate) fn set_retval(&mut self, retval: i64) {
        self.retval = Some(retval);
    }

    pub(crate) fn park_format(&mut self, state: FormatState) {
        self.format = Some(state);
    }

    pub(crate) fn format_mut(&mut self) -> Option<&mut FormatState> {
        self.format.as_mut()
    }

    pub(crate) fn take_format(&mut self) -> Option<FormatState> {
        self.format.take()
    }

    /// Ends the occurrence, releasing whatever a decoder left behind.
    pub(crate) fn retire(&mut self) {
        self.phase = if self.failed() {
            Phase::ExitedOnError
        } else {
            Phase::ExitedComplete
        };
        self.clear_private();
    }

    pub fn set_private<T: Any + Send>(&mut self, payload: T) {
        self.replace_private(PrivateData::new(Box::new(payload), None));
    }

    pub fn set_private_with_cleanup<T, F>(&mut self, payload: T, cleanup: F)
    where
        T: Any + Send,
        F: FnOnce(T) + Send + 'static,
    {
        let cleanup: Cleanup = Box::new(move |payload: Box<dyn Any + Send>| {
            if let Ok(payload) = payload.downcast::<T>() {
                cleanup(*payload);
            }
        });
        self.replace_private(PrivateData::new(Box::new(payload), Some(cleanup)));
    }

    fn replace_private(&mut self, data: PrivateData) {
        if self.private.replace(data).is_some() {
            warn!("tid {}: private data set twice, dropping the first", self.tid);
        }
    }

    pub fn private<T: Any>(&self) -> Option<&T> {
        self.private
            .as_ref()
            .and_then(|data| data.payload.as_ref())
            .and_then(|payload| payload.downcast_ref::<T>())
    }

    /// Hands the payload back to the caller, who becomes responsible for it;
    /// no cleanup runs.
    pub fn take_private<T: Any>(&mut self) -> Option<T> {
        if self.private::<T>().is_none() {
            return None;
        }

        let mut data = self.private.take()?;
        data.cleanup = None;
        let payload = data.payload.take()?;
        payload.downcast::<T>().ok().map(|payload| *payload)
    }

    pub fn has_private(&self) -> bool {
        self.private.is_some()
    }

    /// Drops the payload, running its cleanup.
    pub fn clear_private(&mut self) {
        self.private = None;
    }
}

/// In-flight occurrences, one slot per tracee thread.
#[derive(Debug, Default)]
pub struct CallSites {
    sites: HashMap<u32, Occurrence>,
}

impl CallSites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking `occurrence`. A call still pending on the same thread
    /// can no longer complete; it is handed back so the caller can close it.
    pub fn begin(&mut self, occurrence: Occurrence) -> Option<Occurrence> {
        let stale = self.sites.insert(occurrence.tid(), occurrence);
        if let Some(stale) = &stale {
            warn!(
                "tid {} entered a new call while syscall {} was pending",
                stale.tid(),
                stale.nr()
            );
        }
        stale
    }

    pub fn get(&self, tid: u32) -> Option<&Occurrence> {
        self.sites.get(&tid)
    }

    pub fn get_mut(&mut self, tid: u32) -> Option<&mut Occurrence> {
        self.sites.get_mut(&tid)
    }

    pub fn finish(&mut self, tid: u32) -> Option<Occurrence> {
        self.sites.remove(&tid)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;

    #[derive(Debug, PartialEq)]
    struct Saved(u32);

    #[test]
    fn private_data_round_trip() {
        let mut occ = Occurrence::new(1, RawCall::new(16, [0; 6]));
        assert!(occ.private::<Saved>().is_none());

        occ.set_private(Saved(7));
        assert_eq!(occ.private::<Saved>(), Some(&Saved(7)));
        assert!(occ.private::<u64>().is_none());

        assert_eq!(occ.take_private::<u64>(), None);
        assert!(occ.has_private());
        assert_eq!(occ.take_private::<Saved>(), Some(Saved(7)));
        assert!(!occ.has_private());
    }

    #[test]
    fn cleanup_runs_once_on_retire_but_not_on_take() {
        let ran = Arc::new(AtomicUsize::new(0));

        let mut occ = Occurrence::new(1, RawCall::new(16, [0; 6]));
        let counter = ran.clone();
        occ.set_private_with_cleanup(Saved(1), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        occ.set_retval(-14);
        occ.retire();
        assert_eq!(ran.load(Ordering::SeqCst), 1);
        assert_eq!(occ.phase(), Phase::ExitedOnError);

        let counter = ran.clone();
        occ.set_private_with_cleanup(Saved(2), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(occ.take_private::<Saved>(), Some(Saved(2)));
        occ.retire();
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn setting_twice_keeps_the_second_and_cleans_up_the_first() {
        let ran = Arc::new(AtomicUsize::new(0));

        let mut occ = Occurrence::new(2, RawCall::new(16, [0; 6]));
        let counter = ran.clone();
        occ.set_private_with_cleanup(Saved(1), move |Saved(n)| {
            counter.fetch_add(n as usize, Ordering::SeqCst);
        });
        occ.set_private(Saved(2));

        assert_eq!(ran.load(Ordering::SeqCst), 1);
        assert_eq!(occ.private::<Saved>(), Some(&Saved(2)));
    }

    #[test]
    fn dropping_an_occurrence_runs_cleanup() {
        let ran = Arc::new(AtomicUsize::new(0));
        let counter = ran.clone();

        let mut occ = Occurrence::new(3, RawCall::new(16, [0; 6]));
        occ.set_private_with_cleanup(vec![1u8, 2, 3], move |v| {
            counter.fetch_add(v.len(), Ordering::SeqCst);
        });
        drop(occ);

        assert_eq!(ran.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn call_sites_are_keyed_by_thread() {
        let mut sites = CallSites::new();

        let mut a = Occurrence::new(10, RawCall::new(16, [1; 6]));
        a.set_private(Saved(10));
        let mut b = Occurrence::new(11, RawCall::new(16, [2; 6]));
        b.set_private(Saved(11));

        assert!(sites.begin(a).is_none());
        assert!(sites.begin(b).is_none());
        assert_eq!(sites.len(), 2);

        assert_eq!(sites.get(10).and_then(|o| o.private::<Saved>()), Some(&Saved(10)));
        assert_eq!(sites.get(11).and_then(|o| o.private::<Saved>()), Some(&Saved(11)));

        let stale = sites.begin(Occurrence::new(10, RawCall::new(54, [0; 6])));
        assert_eq!(stale.map(|o| o.nr()), Some(16));
        assert!(sites.finish(11).is_some());
        assert!(sites.finish(11).is_none());
    }
}
