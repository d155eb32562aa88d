mod location;

pub use self::location::LocationSqlExecutor;
