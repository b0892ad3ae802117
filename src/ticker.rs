//! A cancellable periodic redraw trigger.
//!
//! The ticker never touches the graphics context. It runs on its own thread and hands each tick to
//! a closure, which normally forwards it to the thread that owns the context.

use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{bounded, select, tick, Sender};
use log::{debug, error, trace};

pub struct FrameTicker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<u64>>,
}

impl FrameTicker {
    /// Calls `on_tick` with an increasing tick index every `interval` until [`FrameTicker::stop`]
    /// is called, the ticker is dropped, or `on_tick` returns `false`.
    pub fn start<F>(interval: Duration, mut on_tick: F) -> io::Result<Self>
    where
        F: FnMut(u64) -> bool + Send + 'static,
    {
        let (stop_tx, stop_rx) = bounded::<()>(0);
        let ticks = tick(interval);

        let handle = thread::Builder::new()
            .name(String::from("frame-ticker"))
            .spawn(move || {
                let mut index = 0u64;
                loop {
                    select! {
                        recv(ticks) -> _ => {
                            trace!("tick {}", index);
                            if !on_tick(index) {
                                break;
                            }
                            index += 1;
                        }
                        // Fires on an explicit stop and when the sender is dropped
                        recv(stop_rx) -> _ => break,
                    }
                }

                index
            })?;

        debug!("frame ticker started at {:?} per frame", interval);

        Ok(Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Interval for `fps` frames per second. Zero is treated as one.
    pub fn interval_for(fps: u32) -> Duration {
        Duration::from_secs(1) / fps.max(1)
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Stops the ticker and waits for its thread. Once this returns the closure will not be called
    /// again. Calling it twice is harmless.
    pub fn stop(&mut self) -> u64 {
        // Dropping the sender disconnects the channel, which wakes the select
        drop(self.stop.take());

        match self.handle.take() {
            Some(handle) => {
                match handle.join() {
                    Ok(ticks) => {
                        debug!("frame ticker stopped after {} ticks", ticks);
                        ticks
                    }
                    Err(_) => {
                        error!("frame ticker callback panicked");
                        0
                    }
                }
            }
            None => 0,
        }
    }
}

impl Drop for FrameTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[test]
    fn ticks_until_stopped() {
        let count = Arc::new(AtomicU64::new(0));
        let seen = count.clone();

        let mut ticker = FrameTicker::start(Duration::from_millis(1), move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            true
        })
        .unwrap();

        while count.load(Ordering::SeqCst) < 3 {
            thread::sleep(Duration::from_millis(1));
        }

        ticker.stop();
        assert!(!ticker.is_running());

        let after_stop = count.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(count.load(Ordering::SeqCst), after_stop);

        // second stop is a no-op
        assert_eq!(ticker.stop(), 0);
    }

    #[test]
    fn callback_can_end_the_ticker() {
        let mut ticker = FrameTicker::start(Duration::from_millis(1), |index| index < 4).unwrap();

        while ticker.handle.as_ref().map_or(false, |h| !h.is_finished()) {
            thread::sleep(Duration::from_millis(1));
        }

        assert_eq!(ticker.stop(), 4);
    }

    #[test]
    fn indices_increase_by_one() {
        let (tx, rx) = crossbeam::channel::unbounded();
        let mut ticker = FrameTicker::start(Duration::from_millis(1), move |index| tx.send(index).is_ok()).unwrap();

        let received: Vec<u64> = rx.iter().take(5).collect();
        ticker.stop();

        assert_eq!(received, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn panicking_callback_stops_with_zero_ticks() {
        let mut ticker = FrameTicker::start(Duration::from_millis(1), |index| {
            if index == 2 {
                panic!("callback failed on tick {}", index);
            }
            true
        })
        .unwrap();

        while ticker.handle.as_ref().map_or(false, |h| !h.is_finished()) {
            thread::sleep(Duration::from_millis(1));
        }

        assert_eq!(ticker.stop(), 0);
        assert!(!ticker.is_running());
    }

    #[test]
    fn interval_for_frame_rate() {
        assert_eq!(FrameTicker::interval_for(50), Duration::from_millis(20));
        assert_eq!(FrameTicker::interval_for(0), Duration::from_secs(1));
    }
}
