use std::{any::TypeId, sync::Arc};

use crate::{
    cql::{AsAny, CqlError, Row, Value, ValueMap},
    mock::{Chain, Mock, Store},
};

/// An iterator over the rows of a query result.
pub trait Iterx: AsAny + Send + Sync {
    /// Skips the check that every column is mapped to a field.
    fn unsafe_mode(self: Arc<Self>) -> Arc<dyn Iterx>;
    /// Scans rows into structs even when the destination is scannable
    /// as a single value.
    fn struct_only(self: Arc<Self>) -> Arc<dyn Iterx>;

    /// Scans the first row into `dest` and closes the iterator.
    fn get(&self, dest: &mut Row) -> Result<(), CqlError>;
    /// Scans all rows into `dest` and closes the iterator.
    fn select(&self, dest: &mut Vec<Row>) -> Result<(), CqlError>;

    fn struct_scan(&self, dest: &mut Row) -> bool;
    fn scan(&self, dest: &mut [Value]) -> bool;
    fn map_scan(&self, dest: &mut ValueMap) -> bool;

    fn close(&self) -> Result<(), CqlError>;

    #[doc(hidden)]
    fn scan_any(&self, dest: &mut Row) -> bool;
    #[doc(hidden)]
    fn scan_all(&self, dest: &mut Vec<Row>) -> bool;
    #[doc(hidden)]
    fn is_scannable(&self, ty: TypeId) -> bool;
    #[doc(hidden)]
    fn check_err_and_not_found(&self) -> Result<(), CqlError>;
}

impl dyn Iterx {
    /// Returns the concrete iterator behind the trait object.
    pub fn downcast_ref<T: Iterx>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }
}

/// Mock of [`Iterx`].
///
/// Destinations are recorded as a snapshot of their content at the
/// time of the call. Expectations programmed with
/// [`fill`](crate::When::fill) write into them.
///
/// ```
/// use cqlx_mock::{cql::{CqlError, Row}, Iterx, IterxMock, Mock};
/// use std::sync::Arc;
///
/// let iter = Arc::new(IterxMock::new());
/// iter.on(IterxMock::STRUCT_ONLY).then_return_self();
/// iter.on(IterxMock::GET).then_return(Err(CqlError::NotFound));
///
/// let mut row = Row::new();
/// assert_eq!(iter.clone().struct_only().get(&mut row), Err(CqlError::NotFound));
/// ```
#[derive(Debug, Default)]
pub struct IterxMock {
    store: Store,
}

impl IterxMock {
    pub fn new() -> Self {
        IterxMock::default()
    }
}

mocked_methods! {
    IterxMock {
        unsafe_mode() -> Arc<dyn Iterx>;
        struct_only() -> Arc<dyn Iterx>;
        get(Row) -> Result<(), CqlError>;
        select(Vec<Row>) -> Result<(), CqlError>;
        struct_scan(Row) -> bool;
        scan(Vec<Value>) -> bool;
        map_scan(ValueMap) -> bool;
        close() -> Result<(), CqlError>;
        #[doc(hidden)]
        scan_any(Row) -> bool;
        #[doc(hidden)]
        scan_all(Vec<Row>) -> bool;
        #[doc(hidden)]
        is_scannable(TypeId) -> bool;
        #[doc(hidden)]
        check_err_and_not_found() -> Result<(), CqlError>;
    }
}

impl Mock for IterxMock {
    fn store(&self) -> &Store {
        &self.store
    }
}

impl Chain<Arc<dyn Iterx>> for IterxMock {
    fn chain(self: Arc<Self>) -> Arc<dyn Iterx> {
        self
    }
}

impl Iterx for IterxMock {
    fn unsafe_mode(self: Arc<Self>) -> Arc<dyn Iterx> {
        let this = self.clone().chain();
        self.store.call(Self::UNSAFE_MODE, (), Some(this))
    }

    fn struct_only(self: Arc<Self>) -> Arc<dyn Iterx> {
        let this = self.clone().chain();
        self.store.call(Self::STRUCT_ONLY, (), Some(this))
    }

    fn get(&self, dest: &mut Row) -> Result<(), CqlError> {
        self.store.call_into(Self::GET, dest)
    }

    fn select(&self, dest: &mut Vec<Row>) -> Result<(), CqlError> {
        self.store.call_into(Self::SELECT, dest)
    }

    fn struct_scan(&self, dest: &mut Row) -> bool {
        self.store.call_into(Self::STRUCT_SCAN, dest)
    }

    fn scan(&self, dest: &mut [Value]) -> bool {
        let mut args = (dest.to_vec(),);
        let output = self.store.call_mut(Self::SCAN, &mut args, None);
        // a fill cannot resize the slice
        for (slot, value) in dest.iter_mut().zip(args.0) {
            *slot = value;
        }
        output
    }

    fn map_scan(&self, dest: &mut ValueMap) -> bool {
        self.store.call_into(Self::MAP_SCAN, dest)
    }

    fn close(&self) -> Result<(), CqlError> {
        self.store.call(Self::CLOSE, (), None)
    }

    fn scan_any(&self, dest: &mut Row) -> bool {
        self.store.call_into(Self::SCAN_ANY, dest)
    }

    fn scan_all(&self, dest: &mut Vec<Row>) -> bool {
        self.store.call_into(Self::SCAN_ALL, dest)
    }

    fn is_scannable(&self, ty: TypeId) -> bool {
        self.store.call(Self::IS_SCANNABLE, (ty,), None)
    }

    fn check_err_and_not_found(&self) -> Result<(), CqlError> {
        self.store.call(Self::CHECK_ERR_AND_NOT_FOUND, (), None)
    }
}
