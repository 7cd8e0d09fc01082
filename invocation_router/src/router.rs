//! Outbound invocation

use crate::dispatcher::Dispatcher;
use crate::error::InvocationError;
use crate::handle::ModuleHandle;
use call_transport::CallTransport;
use core_types::InvocationPath;
use ipc::{InvocationRequest, SchemaVersion};
use module_contract::Operation;
use module_registry::ModuleRegistry;
use std::sync::Arc;
use wire_codec::{decode, WireEncode, WireValue};

/// One side's router
///
/// Owns the outbound half of a transport and installs a [`Dispatcher`] for
/// the inbound half.
#[derive(Clone, Debug)]
pub struct InvocationRouter {
    transport: CallTransport,
    registry: Arc<ModuleRegistry>,
}

impl InvocationRouter {
    /// Version stamped on calls made without a module handle
    pub const BASELINE_VERSION: SchemaVersion = SchemaVersion::new(1, 0);

    /// Creates a router and installs its dispatcher on the transport
    pub fn new(transport: CallTransport, registry: Arc<ModuleRegistry>) -> Self {
        transport.on_receive(Arc::new(Dispatcher::new(Arc::clone(&registry))));
        Self {
            transport,
            registry,
        }
    }

    pub fn transport(&self) -> &CallTransport {
        &self.transport
    }

    pub fn registry(&self) -> &Arc<ModuleRegistry> {
        &self.registry
    }

    /// Binds a typed handle to a module on the far side
    pub fn handle(&self, path: InvocationPath, version: SchemaVersion) -> ModuleHandle {
        ModuleHandle::new(self.clone(), path, version)
    }

    /// Sends a prepared request and waits for its result
    pub async fn invoke_request(&self, request: InvocationRequest) -> Result<WireValue, InvocationError> {
        let outcome = self.transport.call(request).await?;
        Ok(outcome.into_result()?)
    }

    /// Invokes an operation by name
    pub async fn invoke(
        &self,
        path: &InvocationPath,
        operation: &str,
        params: WireValue,
    ) -> Result<WireValue, InvocationError> {
        self.invoke_request(InvocationRequest::new(
            path.clone(),
            operation,
            Self::BASELINE_VERSION,
            params,
        ))
        .await
    }

    /// Sends a notification by name
    pub fn notify(
        &self,
        path: &InvocationPath,
        operation: &str,
        params: WireValue,
    ) -> Result<(), InvocationError> {
        let request =
            InvocationRequest::new(path.clone(), operation, Self::BASELINE_VERSION, params);
        self.transport.notify(request)?;
        Ok(())
    }

    /// Invokes `O` and decodes its declared output
    pub async fn call<O: Operation>(
        &self,
        path: &InvocationPath,
        params: &O::Params,
    ) -> Result<O::Output, InvocationError> {
        let result = self.invoke(path, O::NAME, params.to_wire()).await?;
        decode::<O::Output>(&result).map_err(InvocationError::Decode)
    }

    /// Sends `O` as a notification
    pub fn send<O: Operation>(
        &self,
        path: &InvocationPath,
        params: &O::Params,
    ) -> Result<(), InvocationError> {
        self.notify(path, O::NAME, params.to_wire())
    }

    /// Closes the transport; pending calls fail with `Disconnected`
    pub fn close(&self) {
        self.transport.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use call_transport::{loopback, FaultPlan, TransportConfig, TransportError};
    use ipc::{FailureCategory, FailureKind, VersionPolicy};
    use module_contract::{
        decode_params, BridgeModule, Delivery, ModuleContract, ModuleError, Side,
    };
    use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
    use std::time::Duration;
    use wire_codec::wire_record;

    wire_record! {
        #[derive(Debug, Clone, PartialEq)]
        pub struct AddParams {
            pub amount: i32 => "amount",
        }
    }

    wire_record! {
        #[derive(Debug, Clone, PartialEq)]
        pub struct NoParams {}
    }

    struct Add;

    impl Operation for Add {
        const NAME: &'static str = "add";
        const FALLIBLE: bool = true;
        type Params = AddParams;
        type Output = i32;
    }

    struct Stall;

    impl Operation for Stall {
        const NAME: &'static str = "stall";
        type Params = NoParams;
        type Output = ();
    }

    struct Boom;

    impl Operation for Boom {
        const NAME: &'static str = "boom";
        type Params = NoParams;
        type Output = ();
    }

    struct Zero;

    impl Operation for Zero {
        const NAME: &'static str = "zero";
        type Params = NoParams;
        type Output = ();
    }

    struct Tick;

    impl Operation for Tick {
        const NAME: &'static str = "tick";
        const DELIVERY: Delivery = Delivery::Notification;
        type Params = NoParams;
        type Output = ();
    }

    /// Pretends `add` returns text, to exercise output decoding
    struct AddAsText;

    impl Operation for AddAsText {
        const NAME: &'static str = "add";
        type Params = AddParams;
        type Output = String;
    }

    struct Counter {
        contract: ModuleContract,
        total: AtomicI32,
        invoked: AtomicUsize,
        ticks: AtomicUsize,
    }

    impl Counter {
        fn new() -> Arc<Self> {
            let contract = ModuleContract::builder(counter_path(), Side::Web)
                .module_name("WebCounter")
                .version(VersionPolicy::current(2, 1).with_min_major(2))
                .operation::<Add>()
                .operation::<Stall>()
                .operation::<Boom>()
                .operation::<Tick>()
                .operation::<Zero>()
                .build()
                .unwrap();
            Arc::new(Self {
                contract,
                total: AtomicI32::new(0),
                invoked: AtomicUsize::new(0),
                ticks: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl BridgeModule for Counter {
        fn contract(&self) -> &ModuleContract {
            &self.contract
        }

        async fn invoke(&self, operation: &str, params: WireValue) -> Result<WireValue, ModuleError> {
            self.invoked.fetch_add(1, Ordering::SeqCst);
            match operation {
                Add::NAME => {
                    let p = decode_params::<Add>(&params)?;
                    if p.amount < 0 {
                        return Err(ModuleError::rejected(
                            FailureKind::RangeError,
                            "amount must not be negative",
                        ));
                    }
                    let total = self.total.fetch_add(p.amount, Ordering::SeqCst) + p.amount;
                    Ok(total.to_wire())
                }
                Stall::NAME => {
                    futures::future::pending::<()>().await;
                    Ok(WireValue::Null)
                }
                Boom::NAME => panic!("counter exploded"),
                Tick::NAME => {
                    self.ticks.fetch_add(1, Ordering::SeqCst);
                    Ok(WireValue::Null)
                }
                Zero::NAME => {
                    self.total.store(0, Ordering::SeqCst);
                    Ok(WireValue::Null)
                }
                other => Err(ModuleError::UnknownOperation {
                    operation: other.to_string(),
                }),
            }
        }
    }

    fn counter_path() -> InvocationPath {
        InvocationPath::new("counter").unwrap()
    }

    struct Fixture {
        native: InvocationRouter,
        web: InvocationRouter,
        counter: Arc<Counter>,
    }

    fn fixture() -> Fixture {
        let (native_t, web_t) = loopback::connect(
            TransportConfig::new("native").with_call_timeout(Duration::from_secs(2)),
            TransportConfig::new("web"),
            FaultPlan::new(),
        );
        let native = InvocationRouter::new(native_t, Arc::new(ModuleRegistry::new()));
        let web = InvocationRouter::new(web_t, Arc::new(ModuleRegistry::new()));
        let counter = Counter::new();
        web.registry().register(counter.clone()).unwrap();
        Fixture {
            native,
            web,
            counter,
        }
    }

    fn counter(f: &Fixture) -> ModuleHandle {
        f.native.handle(counter_path(), SchemaVersion::new(2, 0))
    }

    #[tokio::test(start_paused = true)]
    async fn test_typed_call() {
        let f = fixture();
        let handle = counter(&f);
        assert_eq!(handle.call::<Add>(&AddParams { amount: 3 }).await.unwrap(), 3);
        assert_eq!(handle.call::<Add>(&AddParams { amount: 4 }).await.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_void_call_is_acknowledged() {
        let f = fixture();
        let handle = counter(&f);
        handle.call::<Add>(&AddParams { amount: 5 }).await.unwrap();
        handle.call::<Zero>(&NoParams {}).await.unwrap();
        assert_eq!(f.counter.total.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delivery_mismatch_is_refused() {
        let f = fixture();
        let handle = counter(&f);

        let err = handle.call::<Tick>(&NoParams {}).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::BadParams);

        // Nobody hears about the refusal, but the handler is skipped.
        handle.send::<Add>(&AddParams { amount: 4 }).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(f.counter.invoked.load(Ordering::SeqCst), 0);
        assert_eq!(f.counter.total.load(Ordering::SeqCst), 0);
        assert_eq!(f.native.transport().pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_after_teardown_is_module_gone() {
        let f = fixture();
        f.web.registry().teardown();
        let err = counter(&f).call::<Stall>(&NoParams {}).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::ModuleGone);
    }

    #[tokio::test(start_paused = true)]
    async fn test_module_not_found() {
        let f = fixture();
        let path = InvocationPath::new("grammar").unwrap();
        let err = f.native.invoke(&path, "check", WireValue::empty_record()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::ModuleNotFound);
        assert_eq!(err.category(), FailureCategory::Routing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_incompatible_version() {
        let f = fixture();
        // Router-level calls stamp v1.0, below the module's minimum of v2.
        let err = f
            .native
            .call::<Add>(&counter_path(), &AddParams { amount: 1 })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::IncompatibleVersion);
        assert_eq!(f.counter.invoked.load(Ordering::SeqCst), 0);

        let err = f
            .native
            .handle(counter_path(), SchemaVersion::new(3, 0))
            .call::<Add>(&AddParams { amount: 1 })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::IncompatibleVersion);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_operation() {
        let f = fixture();
        let err = counter(&f)
            .invoke("multiply", WireValue::empty_record())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::UnknownOperation);
        assert_eq!(f.counter.invoked.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bad_params_skip_handler() {
        let f = fixture();
        let handle = counter(&f);

        let err = handle.invoke("add", WireValue::empty_record()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::BadParams);
        assert_eq!(err.category(), FailureCategory::Protocol);

        let params = wire_codec::RecordWriter::new()
            .field("amount", &"three".to_string())
            .finish();
        let err = handle.invoke("add", params).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::BadParams);
        assert!(err.to_string().contains("amount"));

        let params = wire_codec::RecordWriter::new()
            .field("amount", &(i64::from(i32::MAX) + 1))
            .finish();
        let err = handle.invoke("add", params).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::BadParams);

        assert_eq!(f.counter.invoked.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_fields_are_ignored() {
        let f = fixture();
        let params = wire_codec::RecordWriter::new()
            .field("amount", &5i32)
            .field("comment", &"from a newer caller".to_string())
            .finish();
        let result = counter(&f).invoke("add", params).await.unwrap();
        assert_eq!(wire_codec::decode::<i32>(&result).unwrap(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handler_rejection_is_operation_failure() {
        let f = fixture();
        let err = counter(&f)
            .call::<Add>(&AddParams { amount: -1 })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::RangeError);
        assert_eq!(err.category(), FailureCategory::Operation);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handler_panic_is_internal() {
        let f = fixture();
        let err = counter(&f).call::<Boom>(&NoParams {}).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Internal);
        assert!(err.to_string().contains("counter exploded"));

        // The bridge survives.
        assert_eq!(counter(&f).call::<Add>(&AddParams { amount: 1 }).await.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_mid_flight_is_module_gone() {
        let f = fixture();
        let handle = counter(&f);
        let stalled = tokio::spawn(async move { handle.call::<Stall>(&NoParams {}).await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(f.counter.invoked.load(Ordering::SeqCst), 1);
        f.web.registry().unregister(&counter_path()).unwrap();

        let err = stalled.await.unwrap().unwrap_err();
        assert_eq!(err.kind(), FailureKind::ModuleGone);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_call_times_out() {
        let f = fixture();
        let err = counter(&f).call::<Stall>(&NoParams {}).await.unwrap_err();
        assert!(matches!(
            err,
            InvocationError::Transport(TransportError::Timeout { .. })
        ));
        assert_eq!(err.category(), FailureCategory::Transport);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_decode_mismatch() {
        let f = fixture();
        let err = counter(&f)
            .call::<AddAsText>(&AddParams { amount: 2 })
            .await
            .unwrap_err();
        assert!(matches!(err, InvocationError::Decode(_)));
        // The far side still applied it.
        assert_eq!(f.counter.total.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_notifications() {
        let f = fixture();
        let handle = counter(&f);
        for _ in 0..3 {
            handle.send::<Tick>(&NoParams {}).unwrap();
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(f.counter.ticks.load(Ordering::SeqCst), 3);
        assert_eq!(f.native.transport().pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_fails_calls() {
        let f = fixture();
        f.native.close();
        let err = counter(&f).call::<Add>(&AddParams { amount: 1 }).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Disconnected);
        assert!(counter(&f).send::<Tick>(&NoParams {}).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_symmetric_calls() {
        let f = fixture();
        let native_counter = Counter::new();
        f.native.registry().register(native_counter.clone()).unwrap();

        let from_web = f.web.handle(counter_path(), SchemaVersion::new(2, 0));
        assert_eq!(from_web.call::<Add>(&AddParams { amount: 9 }).await.unwrap(), 9);
        assert_eq!(native_counter.total.load(Ordering::SeqCst), 9);
        assert_eq!(f.counter.total.load(Ordering::SeqCst), 0);
    }
}
