use crate::core::async_impl::pending::Pending;
use crate::core::convert::ConverterRegistry;
use crate::core::error::{Error, Result};
use crate::core::evaluator::Evaluator;
use crate::core::network::Network;
use crate::core::node::{Connection, NodeId};
use crate::core::telemetry::Telemetry;
use crate::core::value::Value;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;

pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Schedules network evaluations off the calling thread.
///
/// Each evaluation is one unit of blocking work on tokio's blocking pool; at
/// most `max_concurrency` of them run at once. Concurrent evaluations are
/// independent: they are neither de-duplicated nor ordered, and launching a
/// new one does not cancel those in flight.
#[derive(Clone)]
pub struct EvaluationDriver {
    runtime: Handle,
    converters: Arc<ConverterRegistry>,
    permits: Arc<Semaphore>,
    max_concurrency: usize,
    telemetry: Option<Arc<dyn Telemetry>>,
}

impl EvaluationDriver {
    pub fn new(runtime: Handle, converters: Arc<ConverterRegistry>) -> Self {
        EvaluationDriver {
            runtime,
            converters,
            permits: Arc::new(Semaphore::new(DEFAULT_MAX_CONCURRENCY)),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            telemetry: None,
        }
    }

    /// Binds a driver to the runtime the caller is running in.
    pub fn current(converters: Arc<ConverterRegistry>) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| Error::WorkerFailed(e.to_string()))?;
        Ok(Self::new(runtime, converters))
    }

    pub fn with_concurrency(self, max_concurrency: usize) -> Self {
        assert!(
            max_concurrency > 0,
            "Max concurrency must be greater than 0"
        );
        EvaluationDriver {
            permits: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
            ..self
        }
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn Telemetry>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    pub fn converters(&self) -> &Arc<ConverterRegistry> {
        &self.converters
    }

    pub fn runtime(&self) -> &Handle {
        &self.runtime
    }

    /// Evaluates the network's designated output. Returns immediately.
    pub fn evaluate(&self, network: Arc<Network>) -> Pending<Value> {
        let target = network.output().cloned();
        self.spawn(network, target)
    }

    /// Evaluates output `attribute` of `node`. Returns immediately.
    pub fn evaluate_node(
        &self,
        network: Arc<Network>,
        node: NodeId,
        attribute: impl Into<String>,
    ) -> Pending<Value> {
        self.spawn(network, Some(Connection::new(node, attribute)))
    }

    fn spawn(&self, network: Arc<Network>, target: Option<Connection>) -> Pending<Value> {
        let permits = self.permits.clone();
        let converters = self.converters.clone();
        let telemetry = self.telemetry.clone();

        let task = self.runtime.spawn(async move {
            let target = target.ok_or(Error::NoOutputNode)?;
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|e| Error::WorkerFailed(e.to_string()))?;

            log::debug!("Evaluating {}.{}", target.node, target.attribute);
            let joined = tokio::task::spawn_blocking(move || {
                let mut evaluator = Evaluator::new(&network, &converters);
                if let Some(telemetry) = telemetry.as_deref() {
                    evaluator = evaluator.with_telemetry(telemetry);
                }
                evaluator.attribute(target.node, &target.attribute)
            })
            .await;

            match joined {
                Ok(result) => result,
                Err(join_error) => {
                    log::error!("An evaluation worker panicked: {:?}", join_error);
                    Err(Error::WorkerFailed(join_error.to_string()))
                }
            }
        });
        Pending::new(task, self.runtime.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ProcessError;
    use crate::core::process::{Process, ProcessDescriptor};
    use crate::core::telemetry::MemoryTelemetry;
    use crate::core::value::ValueType;

    struct Square {
        x: f64,
        y: f64,
    }

    impl Process for Square {
        fn run(&mut self) -> Result<(), ProcessError> {
            if self.x.is_nan() {
                panic!("NaN input");
            }
            self.y = self.x * self.x;
            Ok(())
        }
    }

    fn network(x: f64) -> (Arc<Network>, NodeId) {
        let desc = ProcessDescriptor::builder::<Square>("square")
            .input("x", ValueType::Double)
            .output("y", ValueType::Double, |p| Value::Double(p.y))
            .build(|args| Ok(Square { x: args.double(0)?, y: 0.0 }))
            .unwrap();
        let mut network = Network::new();
        let node = network.add_process(Arc::new(desc));
        network.set_parameter(node, "x", x).unwrap();
        network.set_output(node, "y").unwrap();
        (Arc::new(network), node)
    }

    #[tokio::test]
    async fn test_evaluate_output() {
        let driver = EvaluationDriver::current(Arc::new(ConverterRegistry::default())).unwrap();
        let (network, _) = network(3.0);
        assert_eq!(driver.evaluate(network).await.unwrap(), Value::Double(9.0));
    }

    #[tokio::test]
    async fn test_missing_output_fails_the_handle() {
        let driver = EvaluationDriver::current(Arc::new(ConverterRegistry::default())).unwrap();
        let pending = driver.evaluate(Arc::new(Network::new()));
        assert!(matches!(pending.await, Err(Error::NoOutputNode)));
    }

    #[tokio::test]
    async fn test_worker_panic_is_reported() {
        let driver = EvaluationDriver::current(Arc::new(ConverterRegistry::default())).unwrap();
        let (network, node) = network(f64::NAN);
        let pending = driver.evaluate_node(network, node, "y");
        assert!(matches!(pending.await, Err(Error::WorkerFailed(_))));
    }

    #[tokio::test]
    async fn test_concurrent_evaluations_run_independently() {
        let telemetry = Arc::new(MemoryTelemetry::new());
        let driver = EvaluationDriver::current(Arc::new(ConverterRegistry::default()))
            .unwrap()
            .with_concurrency(2)
            .with_telemetry(telemetry.clone());
        assert_eq!(driver.max_concurrency(), 2);

        let (network, _) = network(2.0);
        let handles: Vec<_> = (0..5).map(|_| driver.evaluate(network.clone())).collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap(), Value::Double(4.0));
        }
        assert_eq!(telemetry.invocations("square"), 5);
    }

    #[test]
    #[should_panic(expected = "Max concurrency must be greater than 0")]
    fn test_zero_concurrency_is_rejected() {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let _ = EvaluationDriver::new(runtime.handle().clone(), Arc::new(ConverterRegistry::default()))
            .with_concurrency(0);
    }
}
