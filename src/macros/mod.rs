mod assert_almost_eq;
mod define_indexed_array;
