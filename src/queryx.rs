use std::{collections::BTreeMap, sync::Arc};

use crate::{
    cql::{
        AsAny, CasOutcome, Consistency, Context, CqlError, QueryObserver, RetryPolicy, Row,
        SerialConsistency, SpeculativeExecutionPolicy, Tracer, Transformer, Value, ValueMap,
    },
    iterx::Iterx,
    mock::{Chain, Mock, Store},
};

/// A statement being configured, bound and executed.
///
/// Configuration and binding methods consume the shared query and
/// return it, so calls can be chained:
///
/// ```
/// # use cqlx_mock::{cql::{Consistency, CqlError, Value}, Queryx};
/// # use std::sync::Arc;
/// fn insert(query: Arc<dyn Queryx>, id: i64) -> Result<(), CqlError> {
///     query
///         .consistency(Consistency::LocalQuorum)
///         .bind(vec![Value::from(id)])
///         .exec_release()
/// }
/// ```
pub trait Queryx: AsAny + Send + Sync {
    fn with_bind_transformer(self: Arc<Self>, tr: Transformer) -> Arc<dyn Queryx>;
    fn with_context(self: Arc<Self>, ctx: Context) -> Arc<dyn Queryx>;

    /// Binds the named parameters from the columns of `arg`.
    fn bind_struct(self: Arc<Self>, arg: Row) -> Arc<dyn Queryx>;
    /// Binds from `arg0`, falling back to `arg1` for missing names.
    fn bind_struct_map(self: Arc<Self>, arg0: Row, arg1: ValueMap) -> Arc<dyn Queryx>;
    fn bind_map(self: Arc<Self>, arg: ValueMap) -> Arc<dyn Queryx>;
    /// Binds positional values.
    fn bind(self: Arc<Self>, values: Vec<Value>) -> Arc<dyn Queryx>;

    #[doc(hidden)]
    fn bind_struct_args(&self, arg0: &Row, arg1: &ValueMap) -> Result<Vec<Value>, CqlError>;
    #[doc(hidden)]
    fn bind_map_args(&self, arg: &ValueMap) -> Result<Vec<Value>, CqlError>;

    /// The error raised while binding, if any.
    fn err(&self) -> Result<(), CqlError>;

    fn exec(&self) -> Result<(), CqlError>;
    fn exec_release(&self) -> Result<(), CqlError>;
    fn exec_cas(&self) -> CasOutcome;
    fn exec_cas_release(&self) -> CasOutcome;

    fn get(&self, dest: &mut Row) -> Result<(), CqlError>;
    fn get_release(&self, dest: &mut Row) -> Result<(), CqlError>;
    fn get_cas(&self, dest: &mut Row) -> CasOutcome;
    fn get_cas_release(&self, dest: &mut Row) -> CasOutcome;

    fn select(&self, dest: &mut Vec<Row>) -> Result<(), CqlError>;
    fn select_release(&self, dest: &mut Vec<Row>) -> Result<(), CqlError>;

    fn iter(&self) -> Arc<dyn Iterx>;

    fn consistency(self: Arc<Self>, c: Consistency) -> Arc<dyn Queryx>;
    fn custom_payload(self: Arc<Self>, payload: BTreeMap<String, Vec<u8>>) -> Arc<dyn Queryx>;
    fn trace(self: Arc<Self>, tracer: Arc<dyn Tracer>) -> Arc<dyn Queryx>;
    fn observer(self: Arc<Self>, observer: Arc<dyn QueryObserver>) -> Arc<dyn Queryx>;
    fn page_size(self: Arc<Self>, n: i32) -> Arc<dyn Queryx>;
    fn default_timestamp(self: Arc<Self>, enable: bool) -> Arc<dyn Queryx>;
    fn with_timestamp(self: Arc<Self>, timestamp: i64) -> Arc<dyn Queryx>;
    fn routing_key(self: Arc<Self>, routing_key: Vec<u8>) -> Arc<dyn Queryx>;
    fn prefetch(self: Arc<Self>, p: f64) -> Arc<dyn Queryx>;
    fn retry_policy(self: Arc<Self>, policy: Arc<dyn RetryPolicy>) -> Arc<dyn Queryx>;
    fn set_speculative_execution_policy(
        self: Arc<Self>,
        policy: Arc<dyn SpeculativeExecutionPolicy>,
    ) -> Arc<dyn Queryx>;
    fn idempotent(self: Arc<Self>, value: bool) -> Arc<dyn Queryx>;
    fn serial_consistency(self: Arc<Self>, cons: SerialConsistency) -> Arc<dyn Queryx>;
    fn page_state(self: Arc<Self>, state: Vec<u8>) -> Arc<dyn Queryx>;
    fn no_skip_metadata(self: Arc<Self>) -> Arc<dyn Queryx>;

    /// Returns the query to the pool it came from.
    fn release(&self);

    fn scan(&self, dest: &mut [Value]) -> Result<(), CqlError>;
}

impl dyn Queryx {
    /// Returns the concrete query behind the trait object.
    pub fn downcast_ref<T: Queryx>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }
}

/// Mock of [`Queryx`].
///
/// The `ctx`, `stmt` and `names` fields are never read by the mock.
/// They let a test hand out a query for a given statement and check,
/// at the end of a call chain, which query it got back.
#[derive(Debug, Default)]
pub struct QueryxMock {
    pub ctx: Context,
    pub stmt: String,
    pub names: Vec<String>,
    store: Store,
}

impl QueryxMock {
    pub fn new() -> Self {
        QueryxMock::default()
    }

    /// A mock standing for the query built from `stmt` and `names`.
    pub fn for_statement(ctx: Context, stmt: impl Into<String>, names: Vec<String>) -> Self {
        QueryxMock {
            ctx,
            stmt: stmt.into(),
            names,
            store: Store::new(),
        }
    }
}

mocked_methods! {
    QueryxMock {
        with_bind_transformer(Transformer) -> Arc<dyn Queryx>;
        with_context(Context) -> Arc<dyn Queryx>;
        bind_struct(Row) -> Arc<dyn Queryx>;
        bind_struct_map(Row, ValueMap) -> Arc<dyn Queryx>;
        bind_map(ValueMap) -> Arc<dyn Queryx>;
        bind(Vec<Value>) -> Arc<dyn Queryx>;
        #[doc(hidden)]
        bind_struct_args(Row, ValueMap) -> Result<Vec<Value>, CqlError>;
        #[doc(hidden)]
        bind_map_args(ValueMap) -> Result<Vec<Value>, CqlError>;
        err() -> Result<(), CqlError>;
        exec() -> Result<(), CqlError>;
        exec_release() -> Result<(), CqlError>;
        exec_cas() -> CasOutcome;
        exec_cas_release() -> CasOutcome;
        get(Row) -> Result<(), CqlError>;
        get_release(Row) -> Result<(), CqlError>;
        get_cas(Row) -> CasOutcome;
        get_cas_release(Row) -> CasOutcome;
        select(Vec<Row>) -> Result<(), CqlError>;
        select_release(Vec<Row>) -> Result<(), CqlError>;
        iter() -> Arc<dyn Iterx>;
        consistency(Consistency) -> Arc<dyn Queryx>;
        custom_payload(BTreeMap<String, Vec<u8>>) -> Arc<dyn Queryx>;
        trace(Arc<dyn Tracer>) -> Arc<dyn Queryx>;
        observer(Arc<dyn QueryObserver>) -> Arc<dyn Queryx>;
        page_size(i32) -> Arc<dyn Queryx>;
        default_timestamp(bool) -> Arc<dyn Queryx>;
        with_timestamp(i64) -> Arc<dyn Queryx>;
        routing_key(Vec<u8>) -> Arc<dyn Queryx>;
        prefetch(f64) -> Arc<dyn Queryx>;
        retry_policy(Arc<dyn RetryPolicy>) -> Arc<dyn Queryx>;
        set_speculative_execution_policy(Arc<dyn SpeculativeExecutionPolicy>) -> Arc<dyn Queryx>;
        idempotent(bool) -> Arc<dyn Queryx>;
        serial_consistency(SerialConsistency) -> Arc<dyn Queryx>;
        page_state(Vec<u8>) -> Arc<dyn Queryx>;
        no_skip_metadata() -> Arc<dyn Queryx>;
        release() -> ();
        scan(Vec<Value>) -> Result<(), CqlError>;
    }
}

impl Mock for QueryxMock {
    fn store(&self) -> &Store {
        &self.store
    }
}

impl Chain<Arc<dyn Queryx>> for QueryxMock {
    fn chain(self: Arc<Self>) -> Arc<dyn Queryx> {
        self
    }
}

impl Queryx for QueryxMock {
    fn with_bind_transformer(self: Arc<Self>, tr: Transformer) -> Arc<dyn Queryx> {
        let this = self.clone().chain();
        self.store.call(Self::WITH_BIND_TRANSFORMER, (tr,), Some(this))
    }

    fn with_context(self: Arc<Self>, ctx: Context) -> Arc<dyn Queryx> {
        let this = self.clone().chain();
        self.store.call(Self::WITH_CONTEXT, (ctx,), Some(this))
    }

    fn bind_struct(self: Arc<Self>, arg: Row) -> Arc<dyn Queryx> {
        let this = self.clone().chain();
        self.store.call(Self::BIND_STRUCT, (arg,), Some(this))
    }

    fn bind_struct_map(self: Arc<Self>, arg0: Row, arg1: ValueMap) -> Arc<dyn Queryx> {
        let this = self.clone().chain();
        self.store.call(Self::BIND_STRUCT_MAP, (arg0, arg1), Some(this))
    }

    fn bind_map(self: Arc<Self>, arg: ValueMap) -> Arc<dyn Queryx> {
        let this = self.clone().chain();
        self.store.call(Self::BIND_MAP, (arg,), Some(this))
    }

    fn bind(self: Arc<Self>, values: Vec<Value>) -> Arc<dyn Queryx> {
        let this = self.clone().chain();
        self.store.call(Self::BIND, (values,), Some(this))
    }

    fn bind_struct_args(&self, arg0: &Row, arg1: &ValueMap) -> Result<Vec<Value>, CqlError> {
        let args = (arg0.clone(), arg1.clone());
        self.store.call(Self::BIND_STRUCT_ARGS, args, None)
    }

    fn bind_map_args(&self, arg: &ValueMap) -> Result<Vec<Value>, CqlError> {
        self.store.call(Self::BIND_MAP_ARGS, (arg.clone(),), None)
    }

    fn err(&self) -> Result<(), CqlError> {
        self.store.call(Self::ERR, (), None)
    }

    fn exec(&self) -> Result<(), CqlError> {
        self.store.call(Self::EXEC, (), None)
    }

    fn exec_release(&self) -> Result<(), CqlError> {
        self.store.call(Self::EXEC_RELEASE, (), None)
    }

    fn exec_cas(&self) -> CasOutcome {
        self.store.call(Self::EXEC_CAS, (), None)
    }

    fn exec_cas_release(&self) -> CasOutcome {
        self.store.call(Self::EXEC_CAS_RELEASE, (), None)
    }

    fn get(&self, dest: &mut Row) -> Result<(), CqlError> {
        self.store.call_into(Self::GET, dest)
    }

    fn get_release(&self, dest: &mut Row) -> Result<(), CqlError> {
        self.store.call_into(Self::GET_RELEASE, dest)
    }

    fn get_cas(&self, dest: &mut Row) -> CasOutcome {
        self.store.call_into(Self::GET_CAS, dest)
    }

    fn get_cas_release(&self, dest: &mut Row) -> CasOutcome {
        self.store.call_into(Self::GET_CAS_RELEASE, dest)
    }

    fn select(&self, dest: &mut Vec<Row>) -> Result<(), CqlError> {
        self.store.call_into(Self::SELECT, dest)
    }

    fn select_release(&self, dest: &mut Vec<Row>) -> Result<(), CqlError> {
        self.store.call_into(Self::SELECT_RELEASE, dest)
    }

    fn iter(&self) -> Arc<dyn Iterx> {
        self.store.call(Self::ITER, (), None)
    }

    fn consistency(self: Arc<Self>, c: Consistency) -> Arc<dyn Queryx> {
        let this = self.clone().chain();
        self.store.call(Self::CONSISTENCY, (c,), Some(this))
    }

    fn custom_payload(self: Arc<Self>, payload: BTreeMap<String, Vec<u8>>) -> Arc<dyn Queryx> {
        let this = self.clone().chain();
        self.store.call(Self::CUSTOM_PAYLOAD, (payload,), Some(this))
    }

    fn trace(self: Arc<Self>, tracer: Arc<dyn Tracer>) -> Arc<dyn Queryx> {
        let this = self.clone().chain();
        self.store.call(Self::TRACE, (tracer,), Some(this))
    }

    fn observer(self: Arc<Self>, observer: Arc<dyn QueryObserver>) -> Arc<dyn Queryx> {
        let this = self.clone().chain();
        self.store.call(Self::OBSERVER, (observer,), Some(this))
    }

    fn page_size(self: Arc<Self>, n: i32) -> Arc<dyn Queryx> {
        let this = self.clone().chain();
        self.store.call(Self::PAGE_SIZE, (n,), Some(this))
    }

    fn default_timestamp(self: Arc<Self>, enable: bool) -> Arc<dyn Queryx> {
        let this = self.clone().chain();
        self.store.call(Self::DEFAULT_TIMESTAMP, (enable,), Some(this))
    }

    fn with_timestamp(self: Arc<Self>, timestamp: i64) -> Arc<dyn Queryx> {
        let this = self.clone().chain();
        self.store.call(Self::WITH_TIMESTAMP, (timestamp,), Some(this))
    }

    fn routing_key(self: Arc<Self>, routing_key: Vec<u8>) -> Arc<dyn Queryx> {
        let this = self.clone().chain();
        self.store.call(Self::ROUTING_KEY, (routing_key,), Some(this))
    }

    fn prefetch(self: Arc<Self>, p: f64) -> Arc<dyn Queryx> {
        let this = self.clone().chain();
        self.store.call(Self::PREFETCH, (p,), Some(this))
    }

    fn retry_policy(self: Arc<Self>, policy: Arc<dyn RetryPolicy>) -> Arc<dyn Queryx> {
        let this = self.clone().chain();
        self.store.call(Self::RETRY_POLICY, (policy,), Some(this))
    }

    fn set_speculative_execution_policy(
        self: Arc<Self>,
        policy: Arc<dyn SpeculativeExecutionPolicy>,
    ) -> Arc<dyn Queryx> {
        let this = self.clone().chain();
        self.store
            .call(Self::SET_SPECULATIVE_EXECUTION_POLICY, (policy,), Some(this))
    }

    fn idempotent(self: Arc<Self>, value: bool) -> Arc<dyn Queryx> {
        let this = self.clone().chain();
        self.store.call(Self::IDEMPOTENT, (value,), Some(this))
    }

    fn serial_consistency(self: Arc<Self>, cons: SerialConsistency) -> Arc<dyn Queryx> {
        let this = self.clone().chain();
        self.store.call(Self::SERIAL_CONSISTENCY, (cons,), Some(this))
    }

    fn page_state(self: Arc<Self>, state: Vec<u8>) -> Arc<dyn Queryx> {
        let this = self.clone().chain();
        self.store.call(Self::PAGE_STATE, (state,), Some(this))
    }

    fn no_skip_metadata(self: Arc<Self>) -> Arc<dyn Queryx> {
        let this = self.clone().chain();
        self.store.call(Self::NO_SKIP_METADATA, (), Some(this))
    }

    fn release(&self) {
        self.store.call(Self::RELEASE, (), None)
    }

    fn scan(&self, dest: &mut [Value]) -> Result<(), CqlError> {
        let mut args = (dest.to_vec(),);
        let output = self.store.call_mut(Self::SCAN, &mut args, None);
        // a fill cannot resize the slice
        for (slot, value) in dest.iter_mut().zip(args.0) {
            *slot = value;
        }
        output
    }
}
