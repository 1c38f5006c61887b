pub mod boom;
pub mod gift;
pub mod holding;
pub mod interaction;
pub mod payment;
pub mod transaction_log;
pub mod treasury;
pub mod user;

pub use boom::{Boom, SocialEventKind};
pub use gift::{Gift, GiftStatus, NewGift};
pub use holding::{Holding, NewHolding};
pub use interaction::{ActionType, Interaction, NewInteraction};
pub use payment::{
    NewPaymentTransaction, NewWithdrawalRequest, PaymentMethod, PaymentStatus, PaymentTransaction,
    WithdrawalRequest,
};
pub use transaction_log::{LedgerDirection, LedgerTarget, NewTransactionLogEntry, TransactionLogEntry};
pub use treasury::Treasury;
pub use user::{LoyaltyTier, NewUser, RealBalance, User, UserStatus, VirtualBalance};
