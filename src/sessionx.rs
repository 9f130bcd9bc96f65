use std::sync::Arc;

use crate::{
    cql::{AsAny, Context, CqlError},
    mock::{Mock, Store},
    queryx::Queryx,
};

/// A session: the entry point to build queries.
pub trait Sessionx: AsAny + Send + Sync {
    /// Builds a query bound to `ctx`, naming the statement's bind
    /// markers with `names`.
    fn context_query(&self, ctx: &Context, stmt: &str, names: &[String]) -> Arc<dyn Queryx>;

    /// Builds a query, naming the statement's bind markers with
    /// `names`.
    fn query(&self, stmt: &str, names: &[String]) -> Arc<dyn Queryx>;

    /// Runs a statement that takes no parameters.
    fn exec_stmt(&self, stmt: &str) -> Result<(), CqlError>;

    /// Waits until all nodes agree on the schema version.
    fn await_schema_agreement(&self, ctx: &Context) -> Result<(), CqlError>;

    fn close(&self);
}

impl dyn Sessionx {
    /// Returns the concrete session behind the trait object.
    pub fn downcast_ref<T: Sessionx>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }
}

/// Mock of [`Sessionx`].
///
/// ```
/// use cqlx_mock::{matcher::{eq, eq_against}, Mock, Queryx, QueryxMock, Sessionx, SessionxMock};
/// use std::sync::Arc;
///
/// let names = vec!["name1".to_string(), "name2".to_string()];
/// let query = Arc::new(QueryxMock::new());
/// let session = SessionxMock::new();
/// session
///     .on(SessionxMock::QUERY)
///     .with_args((eq_against("statement"), eq(names.clone())))
///     .then_return(query.clone());
///
/// let built = session.query("statement", &names);
///
/// assert!(std::ptr::eq(built.downcast_ref::<QueryxMock>().unwrap(), &*query));
/// session.assert_number_of_calls(SessionxMock::QUERY, 1);
/// ```
#[derive(Debug, Default)]
pub struct SessionxMock {
    store: Store,
}

impl SessionxMock {
    pub fn new() -> Self {
        SessionxMock::default()
    }
}

mocked_methods! {
    SessionxMock {
        context_query(Context, String, Vec<String>) -> Arc<dyn Queryx>;
        query(String, Vec<String>) -> Arc<dyn Queryx>;
        exec_stmt(String) -> Result<(), CqlError>;
        await_schema_agreement(Context) -> Result<(), CqlError>;
        close() -> ();
    }
}

impl Mock for SessionxMock {
    fn store(&self) -> &Store {
        &self.store
    }
}

impl Sessionx for SessionxMock {
    fn context_query(&self, ctx: &Context, stmt: &str, names: &[String]) -> Arc<dyn Queryx> {
        let args = (ctx.clone(), stmt.to_owned(), names.to_vec());
        self.store.call(Self::CONTEXT_QUERY, args, None)
    }

    fn query(&self, stmt: &str, names: &[String]) -> Arc<dyn Queryx> {
        self.store
            .call(Self::QUERY, (stmt.to_owned(), names.to_vec()), None)
    }

    fn exec_stmt(&self, stmt: &str) -> Result<(), CqlError> {
        self.store.call(Self::EXEC_STMT, (stmt.to_owned(),), None)
    }

    fn await_schema_agreement(&self, ctx: &Context) -> Result<(), CqlError> {
        self.store
            .call(Self::AWAIT_SCHEMA_AGREEMENT, (ctx.clone(),), None)
    }

    fn close(&self) {
        self.store.call(Self::CLOSE, (), None)
    }
}
