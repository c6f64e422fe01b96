// Ctrl-C handling. The signal only raises a flag; the extraction loop polls it
// between lines and rows and then stops like a normal end of input.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Clone, Default)]
pub struct InterruptFlag {
    raised: Arc<AtomicBool>,
}

impl InterruptFlag {
    // A flag nobody raises except through `raise`; used by tests and library callers.
    pub fn new() -> Self {
        Self::default()
    }

    // Listen for Ctrl-C on a background thread with its own small runtime.
    // On unix the handler is registered before this returns.
    pub fn install() -> std::io::Result<Self> {
        let flag = Self::new();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .build()?;

        #[cfg(unix)]
        let mut sigint = {
            let _guard = runtime.enter();
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?
        };

        let listener = flag.clone();
        thread::Builder::new()
            .name("ctrl-c".to_string())
            .spawn(move || {
                runtime.block_on(async {
                    #[cfg(unix)]
                    let received = sigint.recv().await.is_some();
                    #[cfg(not(unix))]
                    let received = match tokio::signal::ctrl_c().await {
                        Ok(()) => true,
                        Err(e) => {
                            log::warn!("interrupt: cannot listen for Ctrl-C: {}", e);
                            false
                        }
                    };
                    if received {
                        log::debug!("interrupt: Ctrl-C received, stopping after current row");
                        listener.raise();
                    }
                });
            })?;
        Ok(flag)
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}
