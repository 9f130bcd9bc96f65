// Declares one `Method` constant per mocked method of a mock.
//
// `query(String, Vec<String>) -> Arc<dyn Queryx>;` expands to
// `pub const QUERY: Method<Self, (String, Vec<String>), Arc<dyn Queryx>>`.
macro_rules! mocked_methods {
    ($mock:ident { $( $(#[$attr:meta])* $method:ident ( $($arg:ty),* ) -> $out:ty; )* }) => {
        paste::paste! {
            impl $mock {
                $(
                    $(#[$attr])*
                    #[doc = concat!("Identifies calls to `", stringify!($method), "`.")]
                    pub const [<$method:upper>]: $crate::Method<$mock, ($($arg,)*), $out> =
                        $crate::Method::new(stringify!($method));
                )*
            }
        }
    };
}
