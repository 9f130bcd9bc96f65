mod common;

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use cqlx_mock::{
    cql::{
        CasOutcome, Consistency, Context, CqlError, ObservedQuery, QueryObserver, RetryPolicy,
        RetryType, Row, SerialConsistency, SpeculativeExecutionPolicy, Tracer, Transformer, Value,
        ValueMap,
    },
    matcher::{any, eq, same},
    pattern, IterxMock, Mock, Queryx, QueryxMock,
};

#[derive(Debug)]
struct NoopTracer;

impl Tracer for NoopTracer {
    fn trace(&self, _: &[u8]) {}
}

#[derive(Debug)]
struct NoopObserver;

impl QueryObserver for NoopObserver {
    fn observe_query(&self, _: &Context, _: &ObservedQuery) {}
}

#[derive(Debug)]
struct AlwaysRetry;

impl RetryPolicy for AlwaysRetry {
    fn attempt(&self, _: usize) -> bool {
        true
    }

    fn retry_type(&self, _: &CqlError) -> RetryType {
        RetryType::Retry
    }
}

#[derive(Debug)]
struct SingleSpeculation;

impl SpeculativeExecutionPolicy for SingleSpeculation {
    fn attempts(&self) -> usize {
        1
    }

    fn delay(&self) -> Duration {
        Duration::from_nanos(1)
    }
}

struct Sut {
    err: CqlError,
    query: Arc<QueryxMock>,
    iter: Arc<IterxMock>,
}

fn make_sut() -> Sut {
    common::init_logging();

    Sut {
        err: CqlError::msg("queryx_error"),
        query: Arc::new(QueryxMock::new()),
        iter: Arc::new(IterxMock::new()),
    }
}

fn potato(name: &str) -> Row {
    Row::new().with("name", name)
}

fn potato_map(name: &str) -> ValueMap {
    let mut map = ValueMap::new();
    map.insert(name.to_string(), Value::from(name));
    map
}

fn is_same(result: &Arc<dyn Queryx>, query: &Arc<QueryxMock>) -> bool {
    result
        .downcast_ref::<QueryxMock>()
        .map_or(false, |result| std::ptr::eq(result, &**query))
}

#[test]
fn with_bind_transformer() {
    let sut = make_sut();
    let tr = Transformer::new(|_, _| Value::Null);
    sut.query
        .on(QueryxMock::WITH_BIND_TRANSFORMER)
        .with_args((eq(tr.clone()),))
        .then_return_self();

    let result = sut.query.clone().with_bind_transformer(tr);

    sut.query.assert_expectations();
    sut.query
        .assert_number_of_calls(QueryxMock::WITH_BIND_TRANSFORMER, 1);
    assert!(is_same(&result, &sut.query));
}

#[test]
fn with_context() {
    let sut = make_sut();
    let ctx = Context::background().with_value("request_id", "7");
    sut.query
        .on(QueryxMock::WITH_CONTEXT)
        .with_args((eq(ctx.clone()),))
        .then_return_self();

    let result = sut.query.clone().with_context(ctx.clone());

    sut.query.assert_expectations();
    sut.query.assert_called(QueryxMock::WITH_CONTEXT, (eq(ctx),));
    assert!(is_same(&result, &sut.query));
}

#[test]
fn bind_struct() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::BIND_STRUCT)
        .with_args((eq(potato("potato")),))
        .then_return_self();

    let result = sut.query.clone().bind_struct(potato("potato"));

    sut.query.assert_expectations();
    sut.query
        .assert_called(QueryxMock::BIND_STRUCT, (eq(potato("potato")),));
    sut.query.assert_number_of_calls(QueryxMock::BIND_STRUCT, 1);
    assert!(is_same(&result, &sut.query));
}

#[test]
fn bind_struct_map() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::BIND_STRUCT_MAP)
        .with_args((eq(potato("potato")), eq(potato_map("potato"))))
        .then_return_self();

    let result = sut
        .query
        .clone()
        .bind_struct_map(potato("potato"), potato_map("potato"));

    sut.query.assert_expectations();
    sut.query.assert_number_of_calls(QueryxMock::BIND_STRUCT_MAP, 1);
    assert!(is_same(&result, &sut.query));
}

#[test]
fn bind_map() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::BIND_MAP)
        .with_args((eq(potato_map("potato")),))
        .then_return_self();

    let result = sut.query.clone().bind_map(potato_map("potato"));

    sut.query.assert_expectations();
    sut.query.assert_number_of_calls(QueryxMock::BIND_MAP, 1);
    assert!(is_same(&result, &sut.query));
}

#[test]
fn bind() {
    let sut = make_sut();
    let values = vec![Value::from("potato"), Value::from(120_i32)];
    sut.query
        .on(QueryxMock::BIND)
        .with_args((eq(values.clone()),))
        .then_return_self();

    let result = sut.query.clone().bind(values);

    sut.query.assert_expectations();
    sut.query.assert_number_of_calls(QueryxMock::BIND, 1);
    assert!(is_same(&result, &sut.query));
}

#[test]
fn bind_struct_args() {
    let sut = make_sut();
    let values = vec![Value::from("potato")];
    sut.query
        .on(QueryxMock::BIND_STRUCT_ARGS)
        .with_args((eq(potato("potato")), eq(potato_map("potato"))))
        .then_return(Ok(values.clone()));

    let result = sut
        .query
        .bind_struct_args(&potato("potato"), &potato_map("potato"));

    sut.query.assert_expectations();
    assert_eq!(result, Ok(values));
}

#[test]
fn bind_struct_args_error() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::BIND_STRUCT_ARGS)
        .then_return(Err(sut.err.clone()));

    let result = sut
        .query
        .bind_struct_args(&potato("potato"), &potato_map("potato"));

    sut.query.assert_expectations();
    assert_eq!(result, Err(sut.err));
}

#[test]
fn bind_map_args() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::BIND_MAP_ARGS)
        .with_args((eq(potato_map("potato")),))
        .then_return(Ok(vec![Value::from("potato")]));

    let result = sut.query.bind_map_args(&potato_map("potato"));

    sut.query.assert_expectations();
    assert_eq!(result, Ok(vec![Value::from("potato")]));
}

#[test]
fn bind_map_args_error() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::BIND_MAP_ARGS)
        .then_return(Err(sut.err.clone()));

    let result = sut.query.bind_map_args(&potato_map("potato"));

    assert_eq!(result, Err(sut.err));
}

#[test]
fn err() {
    let sut = make_sut();
    sut.query.on(QueryxMock::ERR).then_return(Ok(()));

    let result = sut.query.err();

    sut.query.assert_expectations();
    sut.query.assert_number_of_calls(QueryxMock::ERR, 1);
    assert_eq!(result, Ok(()));
}

#[test]
fn err_error() {
    let sut = make_sut();
    sut.query.on(QueryxMock::ERR).then_return(Err(sut.err.clone()));

    let result = sut.query.err();

    assert_eq!(result, Err(sut.err));
}

#[test]
fn exec() {
    let sut = make_sut();
    sut.query.on(QueryxMock::EXEC).then_return(Ok(()));

    let result = sut.query.exec();

    sut.query.assert_expectations();
    sut.query.assert_number_of_calls(QueryxMock::EXEC, 1);
    assert!(result.is_ok());
}

#[test]
fn exec_error() {
    let sut = make_sut();
    sut.query.on(QueryxMock::EXEC).then_return(Err(sut.err.clone()));

    let result = sut.query.exec();

    sut.query.assert_expectations();
    assert_eq!(result.unwrap_err().to_string(), "queryx_error");
}

#[test]
fn exec_release() {
    let sut = make_sut();
    sut.query.on(QueryxMock::EXEC_RELEASE).then_return(Ok(()));

    let result = sut.query.exec_release();

    sut.query.assert_expectations();
    assert!(result.is_ok());
}

#[test]
fn exec_release_error() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::EXEC_RELEASE)
        .then_return(Err(sut.err.clone()));

    let result = sut.query.exec_release();

    assert_eq!(result, Err(sut.err));
}

#[test]
fn exec_cas() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::EXEC_CAS)
        .then_return(CasOutcome::applied());

    let outcome = sut.query.exec_cas();

    sut.query.assert_expectations();
    sut.query.assert_number_of_calls(QueryxMock::EXEC_CAS, 1);
    assert!(outcome.applied);
    assert_eq!(outcome.result, Ok(()));
}

#[test]
fn exec_cas_applied_with_error() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::EXEC_CAS)
        .then_return(CasOutcome::new(true, Err(sut.err.clone())));

    let outcome = sut.query.exec_cas();

    sut.query.assert_expectations();
    assert!(outcome.applied);
    assert_eq!(outcome.result, Err(sut.err.clone()));
    assert_eq!(outcome.into_result(), Err(sut.err));
}

#[test]
fn exec_cas_release() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::EXEC_CAS_RELEASE)
        .then_return(CasOutcome::not_applied());

    let outcome = sut.query.exec_cas_release();

    sut.query.assert_expectations();
    assert!(!outcome.applied);
    assert_eq!(outcome.into_result(), Ok(false));
}

#[test]
fn exec_cas_release_error() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::EXEC_CAS_RELEASE)
        .then_return(CasOutcome::new(true, Err(sut.err.clone())));

    let outcome = sut.query.exec_cas_release();

    assert!(outcome.applied);
    assert_eq!(outcome.result, Err(sut.err));
}

#[test]
fn get() {
    let sut = make_sut();
    let mut dest = potato("potato");
    sut.query
        .on(QueryxMock::GET)
        .with_args((eq(potato("potato")),))
        .then_return(Ok(()));

    let result = sut.query.get(&mut dest);

    sut.query.assert_expectations();
    sut.query.assert_called(QueryxMock::GET, (eq(potato("potato")),));
    assert!(result.is_ok());
}

#[test]
fn get_fills_destination() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::GET)
        .fill(|(row,)| row.set("name", "russet"))
        .then_return(Ok(()));

    let mut dest = Row::new();
    sut.query.get(&mut dest).unwrap();

    assert_eq!(dest, potato("russet"));
}

#[test]
fn get_error() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::GET)
        .then_return(Err(CqlError::NotFound));

    let result = sut.query.get(&mut Row::new());

    assert_eq!(result, Err(CqlError::NotFound));
}

#[test]
fn get_release() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::GET_RELEASE)
        .with_args((eq(potato("potato")),))
        .then_return(Ok(()));

    let result = sut.query.get_release(&mut potato("potato"));

    sut.query.assert_expectations();
    assert!(result.is_ok());
}

#[test]
fn get_release_error() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::GET_RELEASE)
        .then_return(Err(sut.err.clone()));

    let result = sut.query.get_release(&mut potato("potato"));

    assert_eq!(result, Err(sut.err));
}

#[test]
fn get_cas() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::GET_CAS)
        .with_args((eq(potato("potato")),))
        .then_return(CasOutcome::new(true, Err(sut.err.clone())));

    let outcome = sut.query.get_cas(&mut potato("potato"));

    sut.query.assert_expectations();
    assert!(outcome.applied);
    assert_eq!(outcome.result, Err(sut.err));
}

#[test]
fn get_cas_fills_current_row_when_not_applied() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::GET_CAS)
        .fill(|(row,)| *row = potato("yukon"))
        .once()
        .then_return(CasOutcome::not_applied());

    let mut dest = potato("russet");
    let outcome = sut.query.get_cas(&mut dest);

    assert!(!outcome.applied);
    assert_eq!(dest, potato("yukon"));
    sut.query.assert_called(QueryxMock::GET_CAS, (eq(potato("russet")),));
}

#[test]
fn get_cas_release() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::GET_CAS_RELEASE)
        .then_return(CasOutcome::applied());

    let outcome = sut.query.get_cas_release(&mut potato("potato"));

    sut.query.assert_expectations();
    assert_eq!(outcome, CasOutcome::applied());
}

#[test]
fn select() {
    let sut = make_sut();
    let mut dest = vec![potato("potato")];
    sut.query
        .on(QueryxMock::SELECT)
        .with_args((eq(vec![potato("potato")]),))
        .then_return(Ok(()));

    let result = sut.query.select(&mut dest);

    sut.query.assert_expectations();
    sut.query.assert_number_of_calls(QueryxMock::SELECT, 1);
    assert!(result.is_ok());
}

#[test]
fn select_error() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::SELECT)
        .then_return(Err(sut.err.clone()));

    let result = sut.query.select(&mut vec![]);

    assert_eq!(result, Err(sut.err));
}

#[test]
fn select_release() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::SELECT_RELEASE)
        .then_return(Ok(()));

    let result = sut.query.select_release(&mut vec![potato("potato")]);

    sut.query.assert_expectations();
    assert!(result.is_ok());
}

#[test]
fn select_release_error() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::SELECT_RELEASE)
        .then_return(Err(sut.err.clone()));

    let result = sut.query.select_release(&mut vec![potato("potato")]);

    assert_eq!(result, Err(sut.err));
}

#[test]
fn iter() {
    let sut = make_sut();
    sut.query.on(QueryxMock::ITER).then_return(sut.iter.clone());

    let result = sut.query.iter();

    sut.query.assert_expectations();
    sut.query.assert_number_of_calls(QueryxMock::ITER, 1);
    let result = result.downcast_ref::<IterxMock>().unwrap();
    assert!(std::ptr::eq(result, &*sut.iter));
}

#[test]
fn consistency() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::CONSISTENCY)
        .with_args((pattern!(Consistency => Consistency::Quorum | Consistency::LocalQuorum),))
        .then_return_self();

    let result = sut.query.clone().consistency(Consistency::LocalQuorum);

    sut.query.assert_expectations();
    sut.query
        .assert_called(QueryxMock::CONSISTENCY, (eq(Consistency::LocalQuorum),));
    assert!(is_same(&result, &sut.query));
}

#[test]
fn custom_payload() {
    let sut = make_sut();
    let mut payload = BTreeMap::new();
    payload.insert("potato".to_string(), vec![]);
    sut.query
        .on(QueryxMock::CUSTOM_PAYLOAD)
        .with_args((eq(payload.clone()),))
        .then_return_self();

    let result = sut.query.clone().custom_payload(payload);

    sut.query.assert_expectations();
    assert!(is_same(&result, &sut.query));
}

#[test]
fn trace() {
    let sut = make_sut();
    let tracer: Arc<dyn Tracer> = Arc::new(NoopTracer);
    sut.query
        .on(QueryxMock::TRACE)
        .with_args((same(&tracer),))
        .then_return_self();

    let result = sut.query.clone().trace(tracer.clone());

    sut.query.assert_expectations();
    let other: Arc<dyn Tracer> = Arc::new(NoopTracer);
    sut.query.assert_not_called(QueryxMock::TRACE, (same(&other),));
    assert!(is_same(&result, &sut.query));
}

#[test]
fn observer() {
    let sut = make_sut();
    let observer: Arc<dyn QueryObserver> = Arc::new(NoopObserver);
    sut.query
        .on(QueryxMock::OBSERVER)
        .with_args((same(&observer),))
        .then_return_self();

    let result = sut.query.clone().observer(observer);

    sut.query.assert_expectations();
    assert!(is_same(&result, &sut.query));
}

#[test]
fn page_size() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::PAGE_SIZE)
        .with_args((eq(10_i32),))
        .then_return_self();

    let result = sut.query.clone().page_size(10);

    sut.query.assert_expectations();
    assert!(is_same(&result, &sut.query));
}

#[test]
fn default_timestamp() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::DEFAULT_TIMESTAMP)
        .with_args((eq(true),))
        .then_return_self();

    let result = sut.query.clone().default_timestamp(true);

    sut.query.assert_expectations();
    assert!(is_same(&result, &sut.query));
}

#[test]
fn with_timestamp() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::WITH_TIMESTAMP)
        .with_args((eq(10_i64),))
        .then_return_self();

    let result = sut.query.clone().with_timestamp(10);

    sut.query.assert_expectations();
    assert!(is_same(&result, &sut.query));
}

#[test]
fn routing_key() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::ROUTING_KEY)
        .with_args((eq(Vec::<u8>::new()),))
        .then_return_self();

    let result = sut.query.clone().routing_key(vec![]);

    sut.query.assert_expectations();
    assert!(is_same(&result, &sut.query));
}

#[test]
fn prefetch() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::PREFETCH)
        .with_args((eq(10.1_f64),))
        .then_return_self();

    let result = sut.query.clone().prefetch(10.1);

    sut.query.assert_expectations();
    assert!(is_same(&result, &sut.query));
}

#[test]
fn retry_policy() {
    let sut = make_sut();
    let policy: Arc<dyn RetryPolicy> = Arc::new(AlwaysRetry);
    sut.query
        .on(QueryxMock::RETRY_POLICY)
        .with_args((same(&policy),))
        .then_return_self();

    let result = sut.query.clone().retry_policy(policy);

    sut.query.assert_expectations();
    assert!(is_same(&result, &sut.query));
}

#[test]
fn set_speculative_execution_policy() {
    let sut = make_sut();
    let policy: Arc<dyn SpeculativeExecutionPolicy> = Arc::new(SingleSpeculation);
    sut.query
        .on(QueryxMock::SET_SPECULATIVE_EXECUTION_POLICY)
        .with_args((same(&policy),))
        .then_return_self();

    let result = sut.query.clone().set_speculative_execution_policy(policy);

    sut.query.assert_expectations();
    assert!(is_same(&result, &sut.query));
}

#[test]
fn idempotent() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::IDEMPOTENT)
        .with_args((eq(true),))
        .then_return_self();

    let result = sut.query.clone().idempotent(true);

    sut.query.assert_expectations();
    assert!(is_same(&result, &sut.query));
}

#[test]
fn serial_consistency() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::SERIAL_CONSISTENCY)
        .with_args((eq(SerialConsistency::LocalSerial),))
        .then_return_self();

    let result = sut
        .query
        .clone()
        .serial_consistency(SerialConsistency::LocalSerial);

    sut.query.assert_expectations();
    assert!(is_same(&result, &sut.query));
}

#[test]
fn page_state() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::PAGE_STATE)
        .with_args((any(),))
        .then_return_self();

    let result = sut.query.clone().page_state(vec![0xca, 0xfe]);

    sut.query.assert_expectations();
    assert_eq!(
        sut.query.calls(QueryxMock::PAGE_STATE),
        vec![(vec![0xca, 0xfe],)]
    );
    assert!(is_same(&result, &sut.query));
}

#[test]
fn no_skip_metadata() {
    let sut = make_sut();
    sut.query.on(QueryxMock::NO_SKIP_METADATA).then_return_self();

    let result = sut.query.clone().no_skip_metadata();

    sut.query.assert_expectations();
    assert!(is_same(&result, &sut.query));
}

#[test]
fn release() {
    let sut = make_sut();
    sut.query.on(QueryxMock::RELEASE).then_return(());

    sut.query.release();

    sut.query.assert_expectations();
    sut.query.assert_number_of_calls(QueryxMock::RELEASE, 1);
}

#[test]
fn scan() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::SCAN)
        .with_args((eq(vec![Value::Null]),))
        .then_return(Ok(()));

    let result = sut.query.scan(&mut [Value::Null]);

    sut.query.assert_expectations();
    assert!(result.is_ok());
}

#[test]
fn scan_fills_prefix_of_destination() {
    let sut = make_sut();
    sut.query
        .on(QueryxMock::SCAN)
        .fill(|(values,)| {
            values[0] = Value::from("russet");
            values.push(Value::from("ignored"));
        })
        .then_return(Ok(()));

    let mut dest = [Value::Null];
    sut.query.scan(&mut dest).unwrap();

    assert_eq!(dest, [Value::from("russet")]);
}

#[test]
fn scan_error() {
    let sut = make_sut();
    sut.query.on(QueryxMock::SCAN).then_return(Err(sut.err.clone()));

    let result = sut.query.scan(&mut [Value::Null]);

    assert_eq!(result, Err(sut.err));
}

#[test]
fn iter_can_be_chained_from_configuration() {
    let sut = make_sut();
    sut.query.on(QueryxMock::PAGE_SIZE).then_return_self();
    sut.query.on(QueryxMock::ITER).then_return(sut.iter.clone());
    sut.iter.on(IterxMock::STRUCT_ONLY).then_return_self();
    sut.iter.on(IterxMock::SELECT).then_return(Ok(()));

    let mut rows = vec![];
    let result = sut
        .query
        .clone()
        .page_size(100)
        .iter()
        .struct_only()
        .select(&mut rows);

    assert!(result.is_ok());
    sut.query.assert_expectations();
    sut.iter.assert_expectations();
}
