/// Defines a fixed-size array type indexed by a fieldless enumeration with the following
/// parameters:
/// * `$array`: Name of the array type
/// * `$index`: The enumeration used as index; it must implement `strum::IntoEnumIterator` and its
///   variants must be numbered `0..$len` in declaration order
/// * `$len`: The number of variants of `$index`
///
/// The generated type serializes as a plain sequence of `$len` values, so an external loader
/// must provide every entry.
#[macro_export]
macro_rules! define_indexed_array {
    ($array:ident, $index:ty, $len:expr) => {
        #[derive(Copy, Clone, Debug, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(transparent)]
        pub struct $array<T>(pub [T; $len]);

        impl<T> $array<T> {
            pub const LEN: usize = $len;

            pub fn new(values: [T; $len]) -> Self {
                $array(values)
            }

            /// Iterates over `(index, value)` pairs in declaration order.
            pub fn iter(&self) -> impl Iterator<Item = ($index, &T)> + '_ {
                <$index as ::strum::IntoEnumIterator>::iter().zip(self.0.iter())
            }

            pub fn values(&self) -> &[T; $len] {
                &self.0
            }
        }

        impl<T: Copy> $array<T> {
            pub fn splat(value: T) -> Self {
                $array([value; $len])
            }
        }

        impl<T> ::std::ops::Index<$index> for $array<T> {
            type Output = T;
            fn index(&self, index: $index) -> &Self::Output {
                &self.0[index as usize]
            }
        }

        impl<T> ::std::ops::IndexMut<$index> for $array<T> {
            fn index_mut(&mut self, index: $index) -> &mut Self::Output {
                &mut self.0[index as usize]
            }
        }
    };
}
