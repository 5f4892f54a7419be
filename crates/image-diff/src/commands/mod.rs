mod batch;
mod compare;
mod init;

pub use self::batch::batch;
pub use self::compare::compare;
pub use self::init::init;
