//! Typed row sequences over database cursors.
//!
//! The driver is abstracted by [`Queryer`] (a connection or a transaction) and
//! [`Statement`] (a prepared statement). Both hand out a [`RowCursor`], which
//! [`query()`] and [`prepared()`] wrap into a sequence of decoded records.
//!
//! ```
//! use seqs::{CancelToken, Error};
//! use seqs::query::{self, Queryer, Row, RowCursor, Value};
//!
//! struct Table(Vec<Row>);
//! struct Cursor(std::vec::IntoIter<Row>);
//!
//! impl RowCursor for Cursor {
//!     fn next_row(&mut self) -> Result<Option<Row>, Error> {
//!         Ok(self.0.next())
//!     }
//!
//!     fn close(&mut self) -> Result<(), Error> {
//!         Ok(())
//!     }
//! }
//!
//! impl Queryer for Table {
//!     type Cursor = Cursor;
//!
//!     fn query(&self, _sql: &str, _params: &[Value]) -> Result<Cursor, Error> {
//!         Ok(Cursor(self.0.clone().into_iter()))
//!     }
//! }
//!
//! let table = Table(vec![
//!     vec![Value::Int(1), Value::from("ada")],
//!     vec![Value::Int(2), Value::from("grace")],
//! ]);
//!
//! let (users, err) = query::query::<(u32, String), _>(
//!     &table,
//!     "SELECT id, name FROM users",
//!     &[],
//!     &CancelToken::new(),
//! );
//! assert_eq!(
//!     users.collect::<Vec<_>>(),
//!     [(1, "ada".to_owned()), (2, "grace".to_owned())],
//! );
//! assert!(!err.is_set());
//! ```

mod decode;

use std::{fmt::Debug, iter::FusedIterator, marker::PhantomData};

pub use decode::*;

use crate::{CancelToken, Error, ErrorSlot};

/// A single column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
}

/// The values of one row, in column order.
pub type Row = Vec<Value>;

impl Value {
    /// A short name of the kind of this value, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

value_from!(
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Int,
    u16 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    String => Text,
    &str => Text,
    Vec<u8> => Blob,
    &[u8] => Blob,
);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// An open result set of a driver.
pub trait RowCursor {
    /// Fetches the next row, or `None` once the result set is exhausted.
    fn next_row(&mut self) -> Result<Option<Row>, Error>;

    /// Releases the result set. Called exactly once by [`QueryRows`].
    fn close(&mut self) -> Result<(), Error>;
}

/// Something that can run a query: a connection, a pool or a transaction.
pub trait Queryer {
    type Cursor: RowCursor;

    fn query(&self, sql: &str, params: &[Value]) -> Result<Self::Cursor, Error>;
}

/// A prepared statement. Closing the statement itself is up to its owner.
pub trait Statement {
    type Cursor: RowCursor;

    fn query(&self, params: &[Value]) -> Result<Self::Cursor, Error>;
}

impl<Q: Queryer + ?Sized> Queryer for &Q {
    type Cursor = Q::Cursor;

    fn query(&self, sql: &str, params: &[Value]) -> Result<Self::Cursor, Error> {
        (**self).query(sql, params)
    }
}

/// A sequence of records decoded from the rows of a query.
///
/// The cursor is closed exactly once: when the rows run out, at the first error, or
/// when the sequence is dropped, whichever comes first.
///
/// This `struct` is created by [`query()`] and [`prepared()`].
/// See their documentation for more.
pub struct QueryRows<C: RowCursor, T> {
    cursor: Option<C>,
    token: CancelToken,
    slot: ErrorSlot<Error>,
    _marker: PhantomData<fn() -> T>,
}

/// Runs `sql` on `db` and returns a sequence over its rows decoded as `T`.
///
/// `T` is a scalar for single-column results, or a tuple whose fields match the
/// columns in number and order (see [`FromRow`]).
///
/// The query itself runs right away. If it fails, the sequence is empty and the
/// error is in the returned slot. Otherwise the first error while fetching or
/// decoding ends the sequence and lands in the slot, together with any error from
/// closing the cursor. `token` is checked after each decoded row.
pub fn query<T, Q>(
    db: &Q,
    sql: &str,
    params: &[Value],
    token: &CancelToken,
) -> (QueryRows<Q::Cursor, T>, ErrorSlot<Error>)
where
    T: FromRow,
    Q: Queryer + ?Sized,
{
    let cursor = token.check().and_then(|()| db.query(sql, params));
    QueryRows::start(cursor, token)
}

/// Like [`query()`], but runs a prepared statement.
pub fn prepared<T, S>(
    stmt: &S,
    params: &[Value],
    token: &CancelToken,
) -> (QueryRows<S::Cursor, T>, ErrorSlot<Error>)
where
    T: FromRow,
    S: Statement + ?Sized,
{
    let cursor = token.check().and_then(|()| stmt.query(params));
    QueryRows::start(cursor, token)
}

impl<C: RowCursor, T: FromRow> QueryRows<C, T> {
    fn start(cursor: Result<C, Error>, token: &CancelToken) -> (Self, ErrorSlot<Error>) {
        let slot = ErrorSlot::new();
        let cursor = match cursor {
            Ok(cursor) => Some(cursor),
            Err(err) => {
                slot.set(err);
                None
            }
        };

        let rows = Self {
            cursor,
            token: token.clone(),
            slot: slot.clone(),
            _marker: PhantomData,
        };
        (rows, slot)
    }

    fn fetch(&mut self) -> Result<Option<T>, Error> {
        let Some(cursor) = self.cursor.as_mut() else {
            return Ok(None);
        };
        let Some(row) = cursor.next_row()? else {
            return Ok(None);
        };
        let record = T::from_row(row)?;
        self.token.check()?;
        Ok(Some(record))
    }
}

impl<C: RowCursor, T> QueryRows<C, T> {
    // Closes the cursor if still open and records the outcome.
    fn finish(&mut self, err: Option<Error>) {
        let closed = self.cursor.take().and_then(|mut cursor| cursor.close().err());
        if let Some(err) = Error::join(err, closed) {
            self.slot.set(err);
        }
    }

    /// Returns `true` while the cursor is still open.
    pub fn is_open(&self) -> bool {
        self.cursor.is_some()
    }
}

impl<C: RowCursor, T: FromRow> Iterator for QueryRows<C, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        match self.fetch() {
            Ok(Some(record)) => Some(record),
            Ok(None) => {
                self.finish(None);
                None
            }
            Err(err) => {
                self.finish(Some(err));
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.cursor {
            Some(_) => (0, None),
            None => (0, Some(0)),
        }
    }
}

impl<C: RowCursor, T: FromRow> FusedIterator for QueryRows<C, T> {}

impl<C: RowCursor, T> Drop for QueryRows<C, T> {
    fn drop(&mut self) {
        if let Some(mut cursor) = self.cursor.take()
            && let Err(err) = cursor.close()
        {
            tracing::warn!(%err, "closing an abandoned query cursor failed");
            self.slot.set(err);
        }
    }
}

impl<C: RowCursor, T> Debug for QueryRows<C, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryRows")
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}
