use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::join_all;
use futures::FutureExt;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;

use crate::error::{Error, Result};

/// Applies `f` to every item with at most `limit` in flight.
///
/// The output has one entry per input, in input order, whatever order the
/// items finish in. An error or panic in one item never reaches its siblings.
pub async fn map_isolated<I, T, F, Fut>(
    items: Vec<I>,
    limit: usize,
    progress: &ProgressBar,
    f: F,
) -> Vec<Result<T>>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));

    let futures = items.into_iter().map(|item| {
        let sem = semaphore.clone();
        let task = f(item);
        let pb = progress.clone();

        async move {
            let _permit = sem.acquire().await.ok();
            let outcome = match AssertUnwindSafe(task).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(panic) => Err(Error::Task(panic_message(panic.as_ref()))),
            };
            pb.inc(1);
            outcome
        }
    });

    join_all(futures).await
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}

pub fn progress_bar(len: usize, unit: &str, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let template = format!(
        "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {}",
        unit
    );
    let style = ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");

    let pb = ProgressBar::new(len as u64);
    pb.set_style(style);
    pb
}
