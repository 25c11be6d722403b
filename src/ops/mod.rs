pub mod check;
pub mod handle;
pub mod item_ops;
pub mod link_history;
pub mod navigation;
pub mod notice;
pub mod remote;
pub mod selection;
pub mod session;

pub use check::{CheckError, CheckResult, CheckWarning, check_tree};
pub use handle::SessionHandle;
pub use item_ops::{EditError, MoveDirection};
pub use link_history::LinkHistory;
pub use navigation::{NavError, Navigator};
pub use notice::{Notice, NoticeAction, NoticeLevel};
pub use remote::{
    FetchError, FetchOutcome, FetchRequest, FetchTicket, PendingFetch, RemoteFetcher, RemoteRecord,
};
pub use selection::Selection;
pub use session::{AppSession, ChangeCounter, ClickOutcome};
