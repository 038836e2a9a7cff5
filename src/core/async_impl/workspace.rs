use crate::core::async_impl::driver::EvaluationDriver;
use crate::core::async_impl::pending::Pending;
use crate::core::network::Network;
use crate::core::value::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Listener = Arc<dyn Fn(&Arc<Network>) + Send + Sync>;

struct State {
    network: Arc<Network>,
    /// Ticket handed to the most recent `open`/`replace` request.
    requested: u64,
    /// Ticket of the request whose network is installed. An `open` only
    /// yields to a later request that actually installed.
    installed: u64,
    /// Bumped on every install; previews compare against it.
    generation: u64,
    listeners: Vec<Listener>,
}

/// Holds the network currently shown to the user.
///
/// Evaluations started against a network that has since been replaced
/// complete normally, but their continuations no longer touch the workspace.
/// Requests that fail leave both the active network and in-flight work alone.
#[derive(Clone)]
pub struct Workspace {
    state: Arc<Mutex<State>>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(Network::new())
    }
}

impl Workspace {
    pub fn new(network: Network) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                network: Arc::new(network),
                requested: 0,
                installed: 0,
                generation: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// The active network.
    pub fn network(&self) -> Arc<Network> {
        self.lock().network.clone()
    }

    /// Calls `listener` after every network change.
    pub fn on_change<F>(&self, listener: F)
    where
        F: Fn(&Arc<Network>) + Send + Sync + 'static,
    {
        self.lock().listeners.push(Arc::new(listener));
    }

    /// Installs `network` immediately, superseding any pending `open`.
    pub fn replace(&self, network: Network) {
        let ticket = self.request();
        self.install(ticket, Arc::new(network));
    }

    /// Evaluates `network` and makes it the active network once that
    /// evaluation succeeds.
    ///
    /// Resolves to `false` when a later `open` or `replace` has already
    /// installed its network; the evaluated network is then dropped. Later
    /// requests that fail or are still running do not hold this one back.
    pub fn open(&self, driver: &EvaluationDriver, network: Network) -> Pending<bool> {
        let ticket = self.request();
        let network = Arc::new(network);
        let workspace = self.clone();
        driver
            .evaluate(network.clone())
            .then(move |_| workspace.install(ticket, network))
    }

    /// Evaluates the active network's output.
    ///
    /// Resolves to `None` when another network was installed while evaluating.
    pub fn preview(&self, driver: &EvaluationDriver) -> Pending<Option<Value>> {
        let (network, generation) = {
            let state = self.lock();
            (state.network.clone(), state.generation)
        };
        let workspace = self.clone();
        driver.evaluate(network).then(move |value| {
            if workspace.lock().generation == generation {
                Some(value)
            } else {
                log::warn!("Discarding a preview computed for a replaced network.");
                None
            }
        })
    }

    fn request(&self) -> u64 {
        let mut state = self.lock();
        state.requested += 1;
        state.requested
    }

    fn install(&self, ticket: u64, network: Arc<Network>) -> bool {
        let listeners = {
            let mut state = self.lock();
            if state.installed > ticket {
                log::warn!(
                    "Discarding network evaluated for request {}, request {} installed after it.",
                    ticket,
                    state.installed
                );
                return false;
            }
            state.network = network.clone();
            state.installed = ticket;
            state.generation += 1;
            state.listeners.clone()
        };
        for listener in listeners {
            listener(&network);
        }
        true
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::convert::ConverterRegistry;
    use crate::core::error::{Error, ProcessError};
    use crate::core::process::{Process, ProcessDescriptor};
    use crate::core::value::ValueType;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc::{self, Receiver};

    fn constant(value: i64) -> Network {
        let mut network = Network::new();
        let src = network.add_source(value);
        network.set_output(src, "value").unwrap();
        network
    }

    /// Blocks its run until the test releases the gate.
    struct Gated {
        gate: Arc<Mutex<Receiver<()>>>,
        value: i64,
    }

    impl Process for Gated {
        fn run(&mut self) -> Result<(), ProcessError> {
            self.gate
                .lock()
                .unwrap()
                .recv()
                .map_err(|e| ProcessError::Failed(e.to_string()))
        }
    }

    fn gated(value: i64, gate: Receiver<()>) -> Network {
        let gate = Arc::new(Mutex::new(gate));
        let descriptor = ProcessDescriptor::builder::<Gated>("gated")
            .output("value", ValueType::Integer, |p| Value::Integer(p.value))
            .build(move |_| {
                Ok(Gated {
                    gate: gate.clone(),
                    value,
                })
            })
            .unwrap();
        let mut network = Network::new();
        let node = network.add_process(Arc::new(descriptor));
        network.set_output(node, "value").unwrap();
        network
    }

    fn active_value(workspace: &Workspace) -> Value {
        workspace.network().evaluate(&ConverterRegistry::default()).unwrap()
    }

    fn driver() -> EvaluationDriver {
        EvaluationDriver::current(Arc::new(ConverterRegistry::default())).unwrap()
    }

    #[tokio::test]
    async fn test_open_installs_after_success() {
        let workspace = Workspace::default();
        let changes = Arc::new(AtomicUsize::new(0));
        let counter = changes.clone();
        workspace.on_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let installed = workspace.open(&driver(), constant(3)).await.unwrap();
        assert!(installed);
        assert_eq!(changes.load(Ordering::SeqCst), 1);
        assert_eq!(
            workspace.network().evaluate(&ConverterRegistry::default()).unwrap(),
            Value::Integer(3)
        );
    }

    #[tokio::test]
    async fn test_failed_open_keeps_previous_network() {
        let workspace = Workspace::new(constant(1));
        let result = workspace.open(&driver(), Network::new()).await;
        assert!(matches!(result, Err(Error::NoOutputNode)));
        assert!(workspace.network().output().is_some());
    }

    #[tokio::test]
    async fn test_superseded_open_is_discarded() {
        let workspace = Workspace::default();
        let first = workspace.open(&driver(), constant(1));
        workspace.replace(constant(2));

        assert!(!first.await.unwrap());
        assert_eq!(
            workspace.network().evaluate(&ConverterRegistry::default()).unwrap(),
            Value::Integer(2)
        );
    }

    #[tokio::test]
    async fn test_preview_of_replaced_network_is_dropped() {
        let workspace = Workspace::new(constant(5));
        let driver = driver();
        assert_eq!(
            workspace.preview(&driver).await.unwrap(),
            Some(Value::Integer(5))
        );

        let stale = workspace.preview(&driver);
        workspace.replace(constant(6));
        assert_eq!(stale.await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_later_open_does_not_discard_pending_open() {
        let workspace = Workspace::new(constant(1));
        let driver = driver();
        let (release, gate) = mpsc::channel();

        let slow = workspace.open(&driver, gated(42, gate));
        let failed = workspace.open(&driver, Network::new()).await;
        assert!(matches!(failed, Err(Error::NoOutputNode)));
        assert_eq!(active_value(&workspace), Value::Integer(1));

        release.send(()).unwrap();
        assert!(slow.await.unwrap());
        assert_eq!(active_value(&workspace), Value::Integer(42));
    }

    #[tokio::test]
    async fn test_preview_survives_failed_open() {
        let workspace = Workspace::new(constant(5));
        let driver = driver();

        let preview = workspace.preview(&driver);
        let failed = workspace.open(&driver, Network::new());
        assert!(failed.await.is_err());

        assert_eq!(preview.await.unwrap(), Some(Value::Integer(5)));
    }

    #[tokio::test]
    async fn test_installed_open_discards_earlier_pending_open() {
        let workspace = Workspace::new(constant(1));
        let driver = driver();
        let (release, gate) = mpsc::channel();

        let slow = workspace.open(&driver, gated(42, gate));
        assert!(workspace.open(&driver, constant(7)).await.unwrap());

        release.send(()).unwrap();
        assert!(!slow.await.unwrap());
        assert_eq!(active_value(&workspace), Value::Integer(7));
    }
}
