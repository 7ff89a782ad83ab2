//! JVM runtime lifecycle.
//!
//! A process hosts at most one active JVM. [`Runtime::start`] assembles the
//! classpath from the [`JvmConfig`], creates the VM and records the handle in
//! a process-wide slot; later calls return that same handle without touching
//! the classpath again.
//!
//! # Usage
//!
//! ```rust,ignore
//! use weka_bridge::{JvmConfig, Runtime};
//!
//! let config = JvmConfig::builder().packages(true).build()?;
//! let summary = Runtime::scoped(&config, |runtime| {
//!     let classifier = Classifier::new(runtime, "weka.classifiers.trees.J48")?;
//!     classifier.to_commandline()
//! })?;
//! ```
//!
//! # Teardown
//!
//! [`Runtime::stop`] clears the process-wide slot and marks the handle
//! stopped, so every further bridge call fails with
//! [`WekaError::RuntimeStopped`]. The VM is destroyed when the last clone of
//! the handle is dropped; proxies hold a clone, so all of them must be gone
//! first. Most JVMs cannot be created a second time in the same process, so
//! a `start` after teardown usually fails with [`WekaError::RuntimeStart`].
//!
//! # Threads
//!
//! [`Runtime::with_env`] attaches the calling thread as a daemon thread and
//! leaves it attached; the VM does not wait for daemon threads on teardown.

use crate::config::JvmConfig;
use crate::error::{Result, WekaError};
use crate::jvm::bridge;
use crate::jvm::classpath::{self, Classpath};
use jni::{InitArgsBuilder, JNIEnv, JNIVersion, JavaVM};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// The active runtime, if any.
static ACTIVE: Mutex<Option<Runtime>> = Mutex::new(None);

/// Number of local references a single [`Runtime::with_env`] call may create
/// before the frame has to grow.
const LOCAL_FRAME_CAPACITY: i32 = 64;

/// Handle to the embedded JVM.
///
/// Cloning is cheap; all clones refer to the same VM.
#[derive(Clone)]
pub struct Runtime {
    inner: Arc<RuntimeInner>,
}

struct RuntimeInner {
    vm: JavaVM,
    classpath: Classpath,
    stopped: AtomicBool,
}

impl Drop for RuntimeInner {
    fn drop(&mut self) {
        info!("Destroying JVM");
        // SAFETY: every object reference is owned by a proxy that holds a
        // clone of the runtime, so none can outlive this point.
        if let Err(e) = unsafe { self.vm.destroy() } {
            warn!("Failed to destroy JVM: {}", e);
        }
    }
}

static_assertions::assert_impl_all!(Runtime: Send, Sync, Clone);

impl Runtime {
    /// Starts the JVM, or returns the already active runtime.
    ///
    /// The classpath is assembled (user entries, bundled jars, package jars,
    /// system classpath) before the VM is created. A second call while a
    /// runtime is active logs and returns the existing handle; the new
    /// configuration is ignored.
    ///
    /// # Errors
    ///
    /// - [`WekaError::InvalidConfig`] if the configuration does not validate
    /// - [`WekaError::RuntimeStart`] if the VM cannot be created
    pub fn start(config: &JvmConfig) -> Result<Self> {
        Self::start_tracked(config).map(|(runtime, _)| runtime)
    }

    /// Starts the runtime; the flag tells whether this call created it.
    fn start_tracked(config: &JvmConfig) -> Result<(Self, bool)> {
        let mut active = ACTIVE.lock();
        if let Some(runtime) = active.as_ref() {
            info!("JVM already running, call stop() first");
            return Ok((runtime.clone(), false));
        }

        config
            .validate()
            .map_err(|e| WekaError::InvalidConfig(e.to_string()))?;

        let classpath = classpath::assemble(config);
        let vm = create_vm(&classpath, config)?;
        let runtime = Runtime {
            inner: Arc::new(RuntimeInner {
                vm,
                classpath,
                stopped: AtomicBool::new(false),
            }),
        };
        *active = Some(runtime.clone());
        info!("JVM started ({} classpath entries)", runtime.classpath().len());
        Ok((runtime, true))
    }

    /// Runs `f` with a freshly started runtime and stops it afterwards.
    ///
    /// When a runtime is already active, `f` runs against it and it is left
    /// running.
    pub fn scoped<T, F>(config: &JvmConfig, f: F) -> Result<T>
    where
        F: FnOnce(&Runtime) -> Result<T>,
    {
        let (runtime, created) = Self::start_tracked(config)?;
        let result = f(&runtime);
        if created {
            runtime.stop();
        }
        result
    }

    /// The active runtime, if one was started and not stopped.
    pub fn current() -> Option<Self> {
        ACTIVE.lock().clone()
    }

    /// Whether a runtime is active in this process.
    pub fn is_running() -> bool {
        ACTIVE.lock().is_some()
    }

    /// Stops the active runtime, if any.
    pub fn stop_active() {
        let runtime = ACTIVE.lock().take();
        match runtime {
            Some(runtime) => runtime.mark_stopped(),
            None => debug!("JVM not running, nothing to stop"),
        }
    }

    /// Stops this runtime.
    ///
    /// Clears the process-wide slot (when this runtime occupies it) and
    /// rejects further bridge calls through any clone of this handle.
    /// Stopping twice is a no-op.
    pub fn stop(&self) {
        {
            let mut active = ACTIVE.lock();
            if active
                .as_ref()
                .is_some_and(|r| Arc::ptr_eq(&r.inner, &self.inner))
            {
                *active = None;
            }
        }
        self.mark_stopped();
    }

    fn mark_stopped(&self) {
        if !self.inner.stopped.swap(true, Ordering::SeqCst) {
            info!("JVM stopped");
        }
    }

    /// Whether [`stop`](Self::stop) was called on this runtime.
    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::SeqCst)
    }

    /// The classpath the VM was started with.
    pub fn classpath(&self) -> &Classpath {
        &self.inner.classpath
    }

    /// Runs `f` with the JNI environment of the current thread.
    ///
    /// The thread is attached on first use. Local references created by `f`
    /// are released when it returns. A Java exception raised inside `f` is
    /// cleared and returned as [`WekaError::Java`].
    pub fn with_env<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut JNIEnv) -> Result<T>,
    {
        if self.is_stopped() {
            return Err(WekaError::RuntimeStopped);
        }

        let mut env = self.inner.vm.attach_current_thread_as_daemon()?;
        match env.with_local_frame(LOCAL_FRAME_CAPACITY, f) {
            Err(WekaError::Jni(jni::errors::Error::JavaException)) => {
                Err(bridge::take_pending_exception(&mut env).unwrap_or(WekaError::Java {
                    class: "java.lang.Throwable".to_string(),
                    message: "exception already cleared".to_string(),
                }))
            }
            other => {
                if let Some(e) = bridge::take_pending_exception(&mut env) {
                    warn!("Clearing stray Java exception: {}", e);
                }
                other
            }
        }
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("classpath_entries", &self.inner.classpath.len())
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

fn create_vm(classpath: &Classpath, config: &JvmConfig) -> Result<JavaVM> {
    let mut builder = InitArgsBuilder::new()
        .version(JNIVersion::V8)
        .option(format!("-Djava.class.path={}", classpath.to_option_value()))
        .option("-Djava.awt.headless=true");

    match config.heap_option() {
        Some(heap) => {
            debug!("MaxHeapSize={}", heap);
            builder = builder.option(heap);
        }
        None => debug!("MaxHeapSize=default"),
    }

    let args = builder
        .build()
        .map_err(|e| WekaError::RuntimeStart(e.to_string()))?;
    JavaVM::new(args).map_err(|e| WekaError::RuntimeStart(e.to_string()))
}
