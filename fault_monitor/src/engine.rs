use std::num::NonZeroUsize;
use std::sync::mpsc::channel;
use std::sync::Arc;

use data_transfer_objects::OperatingMode;
use log::{debug, info, warn};
use polars::prelude::{DataFrame, NamedFrom, Series};
use threadpool::ThreadPool;

use crate::column_registry::ColumnSpecRegistry;
use crate::error::FaultError;
use crate::input_validator::{self, ValidatedFrame};
use crate::sliding_window;

/// One entry of the AHU fault catalog: which columns it reads, how it tags
/// operating states and what counts as an instantaneous violation. The
/// validation, persistence and output assembly are shared by the engine.
pub trait FaultCondition: Send + Sync {
    type Signals;

    /// Short name used as the prefix of every output column, e.g. `fc15`.
    fn name(&self) -> &str;

    fn registry(&self) -> &ColumnSpecRegistry;

    fn window_size(&self) -> NonZeroUsize;

    fn troubleshoot_mode(&self) -> bool;

    fn signals(&self, frame: ValidatedFrame) -> Result<Self::Signals, FaultError>;

    fn classify(&self, signals: &Self::Signals) -> Vec<OperatingMode>;

    fn evaluate(&self, signals: &Self::Signals, modes: &[OperatingMode]) -> Vec<bool>;

    /// Condition specific troubleshooting columns.
    fn diagnostics(&self, signals: &Self::Signals) -> Vec<Series>;

    fn flag_column(&self) -> String {
        format!("{}_flag", self.name())
    }

    fn mode_column(&self) -> String {
        format!("{}_mode", self.name())
    }

    fn check_column(&self) -> String {
        format!("{}_combined_check", self.name())
    }
}

#[derive(Debug)]
pub struct FaultConditionEngine<C> {
    condition: C,
}

impl<C: FaultCondition> FaultConditionEngine<C> {
    pub fn new(condition: C) -> FaultConditionEngine<C> {
        FaultConditionEngine { condition }
    }

    pub fn condition(&self) -> &C {
        &self.condition
    }

    /// Returns a copy of `frame` with the condition's flag column appended,
    /// plus the diagnostic columns in troubleshoot mode. Fails before any
    /// evaluation if the frame does not validate.
    pub fn apply(&self, frame: &DataFrame) -> Result<DataFrame, FaultError> {
        let name = self.condition.name();
        debug!("Evaluating {} over {} samples", name, frame.height());
        let validated = input_validator::validate(frame, self.condition.registry())?;
        let signals = self.condition.signals(validated)?;
        let modes = self.condition.classify(&signals);
        let instantaneous = self.condition.evaluate(&signals, &modes);

        let window_size = self.condition.window_size();
        if frame.height() < window_size.get() {
            warn!(
                "{}: {} samples never fill a window of {}",
                name,
                frame.height(),
                window_size
            );
        }
        let flags = sliding_window::persist(&instantaneous, window_size);
        info!(
            "{}: {} of {} samples flagged",
            name,
            flags.iter().filter(|&&flag| flag == 1).count(),
            flags.len()
        );

        let mut output = frame.clone();
        output.with_column(Series::new(&self.condition.flag_column(), flags))?;
        if self.condition.troubleshoot_mode() {
            let tags: Vec<&str> = modes.iter().map(OperatingMode::tag).collect();
            output.with_column(Series::new(&self.condition.mode_column(), tags))?;
            output.with_column(Series::new(&self.condition.check_column(), instantaneous))?;
            for series in self.condition.diagnostics(&signals) {
                output.with_column(series)?;
            }
        }
        Ok(output)
    }
}

impl<C: FaultCondition + 'static> FaultConditionEngine<C> {
    /// Evaluates independent frames on at most `workers` threads, never more
    /// than there are frames. Results keep the order of `frames`.
    pub fn apply_batch(
        self: &Arc<Self>,
        frames: Vec<DataFrame>,
        workers: usize,
    ) -> Vec<Result<DataFrame, FaultError>> {
        let count = frames.len();
        let pool = ThreadPool::new(pool_size(workers, count));
        let (tx, rx) = channel();
        for (index, frame) in frames.into_iter().enumerate() {
            let tx = tx.clone();
            let engine = Arc::clone(self);
            pool.execute(move || {
                let _ = tx.send((index, engine.apply(&frame)));
            });
        }
        drop(tx);

        let mut results: Vec<Option<Result<DataFrame, FaultError>>> =
            (0..count).map(|_| None).collect();
        for (index, result) in rx.iter() {
            results[index] = Some(result);
        }
        results
            .into_iter()
            .enumerate()
            .map(|(index, result)| result.unwrap_or(Err(FaultError::Worker(index))))
            .collect()
    }
}

fn pool_size(workers: usize, frames: usize) -> usize {
    workers.clamp(1, frames.max(1))
}
