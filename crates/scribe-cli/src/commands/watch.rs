use super::CommandContext;
use super::check::format_issue;
use anyhow::{Context, Result};
use scribe_engine::{DebouncedAnalyzer, Delivery, Provider};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::debug;

pub async fn run_watch(ctx: &CommandContext, stream: &str) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let provider: Arc<dyn Provider> = ctx.provider.clone();
    let analyzer = DebouncedAnalyzer::new(provider, tx, ctx.config.template(), ctx.config.debounce(), Handle::current());
    eprintln!("Watching stdin ({}ms debounce), end input with Ctrl-D", analyzer.delay().as_millis());

    let stdin = BufReader::new(tokio::io::stdin());
    watch_lines(&analyzer, &mut rx, stream, stdin, &mut std::io::stdout()).await?;

    Ok(())
}

/// Appends each input line to a document and prints debounced results.
///
/// Results older than the latest notification are skipped. After end of input
/// this waits for the cycle covering the final text. Offsets stay valid
/// against the growing document since lines are only ever appended.
///
/// Returns the sequence numbers that were printed.
pub async fn watch_lines<R, W>(
    analyzer: &DebouncedAnalyzer,
    rx: &mut UnboundedReceiver<Delivery>,
    stream: &str,
    input: R,
    out: &mut W,
) -> Result<Vec<u64>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut document = String::new();
    let mut latest = None;
    let mut reported = Vec::new();

    loop {
        tokio::select! {
            line = lines.next_line() => match line.context("failed to read input")? {
                Some(line) => {
                    if !document.is_empty() {
                        document.push('\n');
                    }
                    document.push_str(&line);
                    latest = Some(analyzer.notify(stream, document.as_str()));
                }
                None => break,
            },
            Some(delivery) = rx.recv() => {
                if report(out, &document, &delivery, latest)? {
                    reported.push(delivery.sequence);
                }
            }
        }
    }

    if let Some(last) = latest {
        while reported.last().is_none_or(|&sequence| sequence < last) {
            let Some(delivery) = rx.recv().await else {
                break;
            };
            if report(out, &document, &delivery, latest)? {
                reported.push(delivery.sequence);
            }
        }
    }

    Ok(reported)
}

fn report<W: Write>(out: &mut W, document: &str, delivery: &Delivery, latest: Option<u64>) -> Result<bool> {
    if latest.is_some_and(|latest| delivery.sequence < latest) {
        debug!(sequence = delivery.sequence, "skipping stale result");
        return Ok(false);
    }
    writeln!(out, "--- {} #{}: {} issue(s)", delivery.stream, delivery.sequence, delivery.result.len())?;
    for issue in delivery.result.issues() {
        writeln!(out, "{}", format_issue(&delivery.stream, document, issue))?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_common::{AnalysisRequest, AnalysisResult, ProviderResult};
    use scribe_engine::{MisspellingProvider, RequestTemplate};
    use std::time::Duration;
    use tokio::io::{AsyncWriteExt, DuplexStream};

    /// Misspelling checks that take `work` of (virtual) time on the async path
    struct SlowMisspelling {
        inner: MisspellingProvider,
        work: Duration,
    }

    #[async_trait::async_trait]
    impl Provider for SlowMisspelling {
        fn name(&self) -> &str {
            "slow-misspelling"
        }

        fn analyze(&self, request: &AnalysisRequest) -> ProviderResult<AnalysisResult> {
            self.inner.analyze(request)
        }

        async fn analyze_async(self: Arc<Self>, request: Arc<AnalysisRequest>) -> AnalysisResult {
            tokio::time::sleep(self.work).await;
            self.inner.analyze(&request).unwrap_or_default()
        }
    }

    fn slow_analyzer(delay_ms: u64, work_ms: u64) -> (DebouncedAnalyzer, UnboundedReceiver<Delivery>) {
        let provider = Arc::new(SlowMisspelling {
            inner: MisspellingProvider::default(),
            work: Duration::from_millis(work_ms),
        });
        let (tx, rx) = mpsc::unbounded_channel();
        let analyzer = DebouncedAnalyzer::new(provider, tx, RequestTemplate::default(), Duration::from_millis(delay_ms), Handle::current());
        (analyzer, rx)
    }

    /// Writes `(pause_ms, line)` pairs, then closes the input
    fn type_lines(mut writer: DuplexStream, script: Vec<(u64, &'static str)>) {
        tokio::spawn(async move {
            for (pause, line) in script {
                tokio::time::sleep(Duration::from_millis(pause)).await;
                writer.write_all(format!("{}\n", line).as_bytes()).await.unwrap();
            }
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_newest_result_is_printed_after_eof() {
        let (analyzer, mut rx) = slow_analyzer(50, 100);
        let (writer, reader) = tokio::io::duplex(256);
        // The first cycle is still running when the second line arrives and
        // input ends.
        type_lines(writer, vec![(0, "Fix"), (80, "teh fox")]);

        let mut out = Vec::new();
        let reported = watch_lines(&analyzer, &mut rx, "input", BufReader::new(reader), &mut out).await.unwrap();

        assert_eq!(reported, vec![2]);
        let printed = String::from_utf8(out).unwrap();
        assert_eq!(
            printed,
            "--- input #2: 1 issue(s)\ninput:2:1: warning [SPELL_TEH] Did you mean \"the\"? (suggestions: the)\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_before_eof_does_not_wait_again() {
        let (analyzer, mut rx) = slow_analyzer(50, 10);
        let (mut writer, reader) = tokio::io::duplex(256);
        tokio::spawn(async move {
            writer.write_all(b"all good\n").await.unwrap();
            tokio::time::sleep(Duration::from_millis(500)).await;
            drop(writer);
        });

        let mut out = Vec::new();
        let watched = watch_lines(&analyzer, &mut rx, "input", BufReader::new(reader), &mut out);
        let reported = tokio::time::timeout(Duration::from_secs(5), watched).await.unwrap().unwrap();

        assert_eq!(reported, vec![1]);
        assert_eq!(String::from_utf8(out).unwrap(), "--- input #1: 0 issue(s)\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_input_prints_nothing() {
        let (analyzer, mut rx) = slow_analyzer(50, 10);
        let mut out = Vec::new();
        let reported = watch_lines(&analyzer, &mut rx, "input", BufReader::new(&b""[..]), &mut out).await.unwrap();
        assert!(reported.is_empty());
        assert!(out.is_empty());
    }
}
