use std::fmt;

/// How captured values are folded into the accumulator.
pub trait CombineRule {
    type Value: Clone + fmt::Debug;
    type Accumulator: Clone + fmt::Debug + PartialEq;

    /// The accumulator before anything is captured.
    fn identity(&self) -> Self::Accumulator;

    fn combine(&self, accumulator: Self::Accumulator, value: &Self::Value) -> Self::Accumulator;

    /// The text shown on the display body.
    fn caption(&self, accumulator: &Self::Accumulator) -> String;
}

/// Adds the captured values.
#[derive(Debug, Copy, Clone, Default)]
pub struct Sum;

impl CombineRule for Sum {
    type Value = i64;
    type Accumulator = i64;

    fn identity(&self) -> i64 {
        0
    }

    fn combine(&self, accumulator: i64, value: &i64) -> i64 {
        accumulator + value
    }

    fn caption(&self, accumulator: &i64) -> String {
        format!("Sum\n{accumulator}")
    }
}

/// A right nested list of pairs, terminated by `End`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nested {
    End,
    Pair(i64, Box<Nested>),
}

impl Nested {
    pub fn pair(value: i64, rest: Nested) -> Self {
        Nested::Pair(value, Box::new(rest))
    }

    /// Number of pairs until `End`.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let Nested::Pair(_, rest) = current {
            depth += 1;
            current = rest;
        }
        depth
    }
}

impl fmt::Display for Nested {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Iterative, deep structures would otherwise recurse once per pair.
        let mut closing = 0;
        let mut current = self;
        while let Nested::Pair(value, rest) = current {
            write!(f, "({value},")?;
            closing += 1;
            current = rest;
        }
        f.write_str("End")?;
        for _ in 0..closing {
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Prepends a pair of the captured value and a nested copy of it: `(v, (v, previous))`.
///
/// The most recently captured value ends up nearest to the root.
#[derive(Debug, Copy, Clone, Default)]
pub struct NestedPairs;

impl CombineRule for NestedPairs {
    type Value = i64;
    type Accumulator = Nested;

    fn identity(&self) -> Nested {
        Nested::End
    }

    fn combine(&self, accumulator: Nested, value: &i64) -> Nested {
        Nested::pair(*value, Nested::pair(*value, accumulator))
    }

    fn caption(&self, accumulator: &Nested) -> String {
        accumulator.to_string()
    }
}
