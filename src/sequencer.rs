//! Step-by-step playback over timed items: quiz countdowns, syllable
//! recitation and timeline scrubbing share this shape.

use crate::metre::{MetreError, Pada, Syllable};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SequenceError {
    #[error("Cannot play an empty sequence")]
    Empty,
    #[error("Position {index} is outside a sequence of {len} steps")]
    OutOfRange { index: usize, len: usize },
    #[error("Cannot time syllables: {0}")]
    Timing(#[from] MetreError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step<T> {
    pub value: T,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Active(usize),
    Finished,
}

#[derive(Debug, Clone)]
pub struct Sequencer<T> {
    steps: Vec<Step<T>>,
    position: usize,
    finished: bool,
}

impl<T> Sequencer<T> {
    pub fn new(steps: Vec<Step<T>>) -> Result<Self, SequenceError> {
        if steps.is_empty() {
            return Err(SequenceError::Empty);
        }
        Ok(Self {
            steps,
            position: 0,
            finished: false,
        })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[Step<T>] {
        &self.steps
    }

    pub fn position(&self) -> Option<usize> {
        (!self.finished).then_some(self.position)
    }

    pub fn current(&self) -> Option<&Step<T>> {
        self.position().map(|i| &self.steps[i])
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Move to the next step, or report completion after the last one.
    pub fn advance(&mut self) -> Tick {
        if self.finished {
            return Tick::Finished;
        }
        if self.position + 1 < self.steps.len() {
            self.position += 1;
            Tick::Active(self.position)
        } else {
            self.finished = true;
            Tick::Finished
        }
    }

    pub fn seek(&mut self, index: usize) -> Result<(), SequenceError> {
        if index >= self.steps.len() {
            return Err(SequenceError::OutOfRange {
                index,
                len: self.steps.len(),
            });
        }
        self.position = index;
        self.finished = false;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.position = 0;
        self.finished = false;
    }

    /// Time left including the current step.
    pub fn remaining(&self) -> Duration {
        match self.position() {
            Some(i) => self.steps[i..].iter().map(|s| s.duration).sum(),
            None => Duration::ZERO,
        }
    }

    pub fn total(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }
}

impl Sequencer<u32> {
    /// One step per second, counting down from `seconds` to 1.
    pub fn countdown(seconds: u32) -> Result<Self, SequenceError> {
        let steps = (1..=seconds)
            .rev()
            .map(|value| Step {
                value,
                duration: Duration::from_secs(1),
            })
            .collect();
        Self::new(steps)
    }
}

impl Sequencer<Syllable> {
    /// Syllables of every pāda in order, timed by weight.
    pub fn from_padas(
        padas: &[Pada],
        base: Duration,
        guru_multiplier: f64,
    ) -> Result<Self, SequenceError> {
        let mut steps = Vec::new();
        for pada in padas {
            for (value, duration) in pada.timings(base, guru_multiplier)? {
                steps.push(Step { value, duration });
            }
        }
        Self::new(steps)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use playback::{Playback, PlaybackHandle};

#[cfg(not(target_arch = "wasm32"))]
mod playback {
    use super::{Sequencer, Tick};
    use tokio::sync::watch;
    use tokio::task::JoinHandle;

    /// Drives a sequencer on the tokio timer, publishing the active index.
    pub struct Playback;

    impl Playback {
        pub fn start<T: Send + 'static>(mut sequencer: Sequencer<T>) -> PlaybackHandle {
            sequencer.reset();
            let (tx, rx) = watch::channel(Tick::Active(0));
            let task = tokio::spawn(async move {
                loop {
                    let Some(duration) = sequencer.current().map(|s| s.duration) else {
                        break;
                    };
                    tokio::time::sleep(duration).await;
                    let tick = sequencer.advance();
                    if tx.send(tick).is_err() || tick == Tick::Finished {
                        break;
                    }
                }
            });
            PlaybackHandle {
                task: Some(task),
                ticks: rx,
            }
        }
    }

    /// Owner of a running playback. Dropping it stops the timer task.
    pub struct PlaybackHandle {
        task: Option<JoinHandle<()>>,
        ticks: watch::Receiver<Tick>,
    }

    impl PlaybackHandle {
        pub fn current(&self) -> Tick {
            *self.ticks.borrow()
        }

        /// Wait for the next published tick; `None` once playback has stopped.
        pub async fn changed(&mut self) -> Option<Tick> {
            self.ticks.changed().await.ok()?;
            Some(*self.ticks.borrow_and_update())
        }

        pub async fn finished(&mut self) {
            while self.current() != Tick::Finished {
                if self.changed().await.is_none() {
                    break;
                }
            }
        }

        pub fn stop(&mut self) {
            if let Some(task) = self.task.take() {
                task.abort();
                tracing::debug!("playback stopped");
            }
        }

        pub fn is_running(&self) -> bool {
            self.task.as_ref().is_some_and(|t| !t.is_finished())
        }
    }

    impl Drop for PlaybackHandle {
        fn drop(&mut self) {
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metre::parse_metrical_data;

    fn steps(n: usize) -> Vec<Step<usize>> {
        (0..n)
            .map(|value| Step {
                value,
                duration: Duration::from_millis(100),
            })
            .collect()
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(Sequencer::<usize>::new(vec![]).unwrap_err(), SequenceError::Empty);
        assert!(Sequencer::countdown(0).is_err());
    }

    #[test]
    fn test_advance_to_finish() {
        let mut s = Sequencer::new(steps(3)).unwrap();
        assert_eq!(s.position(), Some(0));
        assert_eq!(s.advance(), Tick::Active(1));
        assert_eq!(s.advance(), Tick::Active(2));
        assert_eq!(s.advance(), Tick::Finished);
        assert!(s.is_finished());
        assert_eq!(s.current(), None);
        assert_eq!(s.advance(), Tick::Finished);
    }

    #[test]
    fn test_seek_and_remaining() {
        let mut s = Sequencer::new(steps(5)).unwrap();
        assert_eq!(s.remaining(), Duration::from_millis(500));
        s.seek(3).unwrap();
        assert_eq!(s.current().unwrap().value, 3);
        assert_eq!(s.remaining(), Duration::from_millis(200));
        assert_eq!(
            s.seek(5),
            Err(SequenceError::OutOfRange { index: 5, len: 5 })
        );
        s.reset();
        assert_eq!(s.position(), Some(0));
    }

    #[test]
    fn test_seek_revives_finished_sequence() {
        let mut s = Sequencer::new(steps(1)).unwrap();
        assert_eq!(s.advance(), Tick::Finished);
        s.seek(0).unwrap();
        assert!(!s.is_finished());
    }

    #[test]
    fn test_countdown() {
        let s = Sequencer::countdown(3).unwrap();
        let values: Vec<u32> = s.steps().iter().map(|st| st.value).collect();
        assert_eq!(values, vec![3, 2, 1]);
        assert_eq!(s.total(), Duration::from_secs(3));
    }

    #[test]
    fn test_from_padas() {
        let padas = parse_metrical_data("LG<br />G").unwrap();
        let s = Sequencer::from_padas(&padas, Duration::from_millis(100), 2.0).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s.total(), Duration::from_millis(500));
        assert!(Sequencer::from_padas(&[], Duration::from_millis(100), 2.0).is_err());
    }

    #[test]
    fn test_from_padas_negative_multiplier_is_an_error() {
        let padas = parse_metrical_data("LG").unwrap();
        let err = Sequencer::from_padas(&padas, Duration::from_millis(300), -1.0).unwrap_err();
        assert!(matches!(err, SequenceError::Timing(MetreError::Multiplier(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_playback_runs_to_completion() {
        let mut handle = Playback::start(Sequencer::new(steps(3)).unwrap());
        assert_eq!(handle.current(), Tick::Active(0));
        let mut seen = Vec::new();
        while let Some(tick) = handle.changed().await {
            seen.push(tick);
            if tick == Tick::Finished {
                break;
            }
        }
        assert_eq!(seen, vec![Tick::Active(1), Tick::Active(2), Tick::Finished]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_playback_stop_releases_task() {
        let mut handle = Playback::start(Sequencer::countdown(60).unwrap());
        assert!(handle.is_running());
        handle.stop();
        assert!(!handle.is_running());
        // The sender is gone once the aborted task is dropped
        assert_eq!(handle.changed().await, None);
    }
}
