mod common;

use std::{fmt, sync::Arc};

use cqlx_mock::{
    cql::{Consistency, Context, Row, Tracer, Value},
    from_fn,
    matcher::{self, any, eq, eq_against, same, ArgMatcher, InvocationMatcher},
    pattern, Mock, Queryx, QueryxMock, Sessionx, SessionxMock,
};

#[derive(Debug)]
struct NoopTracer;

impl Tracer for NoopTracer {
    fn trace(&self, _: &[u8]) {}
}

#[test]
fn success_with_args() {
    common::init_logging();

    let session = SessionxMock::new();
    session.on(SessionxMock::CLOSE).with_args(()).then(|_| ());
    session.close();

    session
        .on(SessionxMock::QUERY)
        .with_args((any(), eq(vec!["id".to_string()])))
        .then_return(Arc::new(QueryxMock::new()));
    session.query("SELECT * FROM t WHERE id = ?", &["id".to_string()]);

    session.assert_expectations();
}

#[test]
fn from_fn_matcher() {
    common::init_logging();

    let session = SessionxMock::new();
    session
        .on(SessionxMock::EXEC_STMT)
        .with_args((from_fn!(|stmt: &String| stmt.starts_with("CREATE")),))
        .then_return(Ok(()));

    assert!(session.exec_stmt("CREATE TABLE t (id int PRIMARY KEY)").is_ok());
}

#[test]
fn pattern_matcher() {
    common::init_logging();

    let query = Arc::new(QueryxMock::new());
    query
        .on(QueryxMock::PAGE_SIZE)
        .with_args((pattern!(i32 => 1..=5000),))
        .then_return_self();

    let _ = query.clone().page_size(5000);
    query.assert_called(QueryxMock::PAGE_SIZE, (pattern!(i32 => 5000),));
    query.assert_called(QueryxMock::PAGE_SIZE, (pattern!(i32 => 100 | 5000),));
    query.assert_not_called(QueryxMock::PAGE_SIZE, (pattern!(i32 => 100 | 200),));
}

#[test]
fn custom_matcher() {
    common::init_logging();

    struct HasColumn(&'static str);

    impl ArgMatcher<Row> for HasColumn {
        fn matches(&self, row: &Row) -> bool {
            row.get(self.0).is_some()
        }
    }

    impl fmt::Display for HasColumn {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "_.get({:?}).is_some()", self.0)
        }
    }

    let query = Arc::new(QueryxMock::new());
    query
        .on(QueryxMock::BIND_STRUCT)
        .with_args((HasColumn("name"),))
        .then_return_self();

    let _ = query.clone().bind_struct(Row::new().with("name", "russet"));
    query.assert_expectations();
}

#[test]
fn same_matches_by_identity() {
    let tracer: Arc<dyn Tracer> = Arc::new(NoopTracer);
    let other: Arc<dyn Tracer> = Arc::new(NoopTracer);

    let matcher = same(&tracer);

    assert!(matcher.matches(&tracer.clone()));
    assert!(!matcher.matches(&other));
    assert!(matcher.to_string().starts_with("same as 0x"));
}

#[test]
fn display_of_matchers() {
    assert_eq!(any().to_string(), "_");
    assert_eq!(eq(Consistency::One).to_string(), "One");
    assert_eq!(eq_against("TRUNCATE t").to_string(), "_ == \"TRUNCATE t\"");
    assert!(pattern!(Consistency => Consistency::One | Consistency::LocalOne)
        .to_string()
        .contains("Consistency::LocalOne"));
    assert_eq!(
        matcher::from_fn(|value: &Value| *value == Value::Null, "is null").to_string(),
        "is null"
    );
}

#[test]
fn mismatch_report() {
    let matcher = (eq(Context::background()), eq_against("TRUNCATE t"));
    let args = (Context::background(), "TRUNCATE u".to_string());

    let mismatch = matcher
        .matches(&args)
        .unwrap_err()
        .formatted(InvocationMatcher::<(Context, String)>::expectations(&matcher))
        .to_string();

    assert!(mismatch.starts_with("Arguments did not match."));
    assert!(mismatch.contains("Argument 1:"));
    assert!(!mismatch.contains("Argument 0:"));
    assert!(mismatch.contains("\"TRUNCATE u\""));
}

#[test]
#[should_panic(expected = "Argument did not match.")]
fn fail_with_args() {
    common::init_logging();

    let session = SessionxMock::new();
    session
        .on(SessionxMock::EXEC_STMT)
        .with_args((eq_against("TRUNCATE t"),))
        .then_return(Ok(()));

    let _ = session.exec_stmt("TRUNCATE u");
}
