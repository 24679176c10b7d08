/// Asserts that two floats differ by at most `$prec`, using
/// [`almost_eq`](crate::numeric::almost_eq). An optional trailing format string and arguments
/// are added to the panic message.
#[macro_export]
macro_rules! assert_almost_eq {
    ($a:expr, $b:expr, $prec:expr $(,)?) => {
        if !$crate::numeric::almost_eq($a, $b, $prec) {
            panic!(
                "assertion failed: `abs(left - right) < {:e}`, (left: `{}`, right: `{}`)",
                $prec, $a, $b
            );
        }
    };
    ($a:expr, $b:expr, $prec:expr, $($arg:tt)+) => {
        if !$crate::numeric::almost_eq($a, $b, $prec) {
            panic!(
                "assertion failed: `abs(left - right) < {:e}`, (left: `{}`, right: `{}`): {}",
                $prec, $a, $b, format_args!($($arg)+)
            );
        }
    };
}
