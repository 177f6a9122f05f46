//! Background parse coordinator.
//!
//! Eligible function bodies are fast-scanned on the main thread and handed
//! to a fixed worker pool as immutable [`WorkItem`]s over an MPMC channel.
//! Each worker parses bodies into its own arena; results come back over a
//! second channel and are spliced into the main arena after the top-level
//! parse finishes. Merging is ordered by source position, never by
//! completion order, so the final arena layout is deterministic.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam::channel::{unbounded, Sender};
use parking_lot::Mutex;
use tracing::debug;
use vireo_ir::{FuncId, FunctionFlags, NodeArena, NodeId, StringInterner, SymbolTable};
use vireo_lexer::SourceBuffer;

use crate::defer::{merge_subunit, parse_body_subunit, SubUnit};
use crate::error::{PResult, ParseError};
use crate::grammar::Parser;
use crate::options::ParseOptions;
use crate::ParseResult;

/// One deferred body handed to the pool. Offsets are absolute, so workers
/// scan their own buffer over the same source.
pub(crate) struct WorkItem {
    pub func: FuncId,
    /// Offset of the body's `{`.
    pub restore: u32,
    pub strict: bool,
    pub flags: FunctionFlags,
}

struct Completed {
    func: FuncId,
    result: PResult<SubUnit>,
}

/// The grammar driver's view of the pool: enqueue and failure check.
pub(crate) struct BackgroundHandle {
    work_tx: Sender<WorkItem>,
    pending: Arc<AtomicUsize>,
    failed: Arc<Mutex<Option<ParseError>>>,
}

impl BackgroundHandle {
    pub(crate) fn enqueue(&self, item: WorkItem) {
        if self.work_tx.send(item).is_ok() {
            self.pending.fetch_add(1, Ordering::Release);
        }
    }

    /// Once a worker has failed, the driver stops enqueueing; remaining
    /// bodies fall back to plain stubs.
    pub(crate) fn has_failed(&self) -> bool {
        self.failed.lock().is_some()
    }
}

/// Keep the lexically earliest failure across all threads.
fn record_failure(failed: &Mutex<Option<ParseError>>, err: &ParseError) {
    let mut slot = failed.lock();
    let earlier = match slot.as_ref() {
        Some(prev) => err.span.start < prev.span.start,
        None => true,
    };
    if earlier {
        *slot = Some(err.clone());
    }
}

fn earliest(a: ParseError, b: Option<ParseError>) -> ParseError {
    match b {
        Some(b) if b.span.start < a.span.start => b,
        _ => a,
    }
}

/// Parse with `background_threads` workers assisting on deferred bodies.
///
/// The main thread runs the top-level grammar, then helps drain the work
/// queue itself before blocking on completions. Worker errors do not
/// interrupt the main parse; the lexically earliest error across every
/// thread is the one reported.
pub(crate) fn parse_parallel(
    source: &str,
    buffer: &SourceBuffer,
    interner: &StringInterner,
    options: &ParseOptions,
) -> ParseResult {
    let (work_tx, work_rx) = unbounded::<WorkItem>();
    let (done_tx, done_rx) = unbounded::<Completed>();
    let pending = Arc::new(AtomicUsize::new(0));
    let failed: Arc<Mutex<Option<ParseError>>> = Arc::new(Mutex::new(None));

    std::thread::scope(|scope| {
        for _ in 0..options.background_threads {
            let work_rx = work_rx.clone();
            let done_tx = done_tx.clone();
            let failed = Arc::clone(&failed);
            scope.spawn(move || {
                // Per-worker buffer over the shared source text.
                let buf = SourceBuffer::new(source);
                while let Ok(item) = work_rx.recv() {
                    let result = parse_body_subunit(
                        source,
                        &buf,
                        interner,
                        options,
                        item.restore,
                        item.strict,
                        item.flags,
                    );
                    if let Err(err) = &result {
                        record_failure(&failed, err);
                    }
                    let sent = done_tx.send(Completed {
                        func: item.func,
                        result,
                    });
                    if sent.is_err() {
                        break;
                    }
                }
            });
        }

        let handle = BackgroundHandle {
            work_tx: work_tx.clone(),
            pending: Arc::clone(&pending),
            failed: Arc::clone(&failed),
        };
        let outcome = Parser::new(source, buffer, interner, options, Some(handle))
            .and_then(|mut parser| {
                let root = parser.parse_program()?;
                Ok((parser, root))
            });

        let (parser, root) = match outcome {
            Ok(parsed) => parsed,
            Err(err) => {
                // Abandon queued work; in-flight results are discarded.
                while work_rx.try_recv().is_ok() {}
                drop(work_tx);
                drop(done_tx);
                for _ in done_rx.iter() {}
                let worker_err = failed.lock().take();
                return ParseResult {
                    arena: NodeArena::new(),
                    symbols: SymbolTable::new(),
                    root: NodeId::INVALID,
                    error: Some(earliest(err, worker_err)),
                };
            }
        };

        // Dropping the parser drops its handle; no further enqueues.
        let (mut arena, mut symbols) = parser.finish();
        let mut completions: Vec<Completed> = Vec::new();

        // Help with whatever is still queued before blocking on the pool.
        while let Ok(item) = work_rx.try_recv() {
            let result = parse_body_subunit(
                source,
                buffer,
                interner,
                options,
                item.restore,
                item.strict,
                item.flags,
            );
            if let Err(err) = &result {
                record_failure(&failed, err);
            }
            completions.push(Completed {
                func: item.func,
                result,
            });
        }

        // Every enqueued item reaches `completions` exactly once, from a
        // worker or from the help loop above.
        drop(work_tx);
        let expected = pending.load(Ordering::Acquire);
        while completions.len() < expected {
            match done_rx.recv() {
                Ok(done) => completions.push(done),
                Err(_) => break,
            }
        }
        drop(done_tx);
        debug!(bodies = completions.len(), "background pool drained");

        completions.sort_by_key(|c| arena.function(c.func).span.start);

        let mut error: Option<ParseError> = None;
        for done in completions {
            match done.result {
                Ok(sub) => {
                    let scopes = arena
                        .function(done.func)
                        .stub
                        .as_ref()
                        .map(|s| s.open_scopes.clone())
                        .unwrap_or_default();
                    merge_subunit(&mut arena, &mut symbols, done.func, &scopes, sub);
                }
                Err(err) => {
                    error = Some(match error.take() {
                        Some(prev) => earliest(prev, Some(err)),
                        None => err,
                    });
                }
            }
        }

        ParseResult {
            arena,
            symbols,
            root,
            error,
        }
    })
}
