use cw_storage_plus::{Item, Map};
use nft_marketplace::auction_house::{Auction, Config, FeeSchedule};

/// Stores the config of the contract
pub const CONFIG: Item<Config> = Item::new("config");
/// Stores the fee tiers, default fee and minimum USD threshold
pub const FEE_SCHEDULE: Item<FeeSchedule> = Item::new("fee_schedule");
/// Stores every auction ever created. Key is the auction id.
pub const AUCTIONS: Map<u64, Auction> = Map::new("auctions");
/// Id assigned to the next auction, starts at 0
pub const NEXT_AUCTION_ID: Item<u64> = Item::new("next_auction_id");
/// Set while a mutating operation and its outbound messages are executing
pub const LOCKED: Item<bool> = Item::new("locked");
