use cosmwasm_std::{coins, to_json_binary, Addr, Coin, Empty, Int128, Uint128};
use cw20::{BalanceResponse, Cw20QueryMsg, Cw20ReceiveMsg};
use cw721::{Cw721ExecuteMsg, Cw721QueryMsg, Cw721ReceiveMsg, OwnerOfResponse};
use cw_multi_test::{App, AppResponse, Executor};
use nft_marketplace::auction_house::{
    Auction, ExecuteMsg, InstantiateMsg, QueryMsg, ReceiveNftMsg, ReceiveTokenMsg,
};

use super::mocks::{self, nft, oracle, token, Hook};
use crate::ContractError;

const NATIVE: &str = "unative";
const DAY: u64 = 86_400;
const START_BALANCE: u128 = 10_000_000;

struct Suite {
    app: App,
    market: Addr,
    nft: Addr,
    token: Addr,
    oracle: Addr,
}

fn addr(name: &str) -> Addr {
    Addr::unchecked(name)
}

impl Suite {
    /// Seller owns tokens "1" to "3", bidders hold native coins and tokens.
    /// Native trades at $1,500 and the token at $1.
    fn new() -> Self {
        let mut app = App::new(|router, _api, storage| {
            for bidder in ["bidder_a", "bidder_b"] {
                router
                    .bank
                    .init_balance(storage, &addr(bidder), coins(START_BALANCE, NATIVE))
                    .unwrap();
            }
        });

        let nft_code = app.store_code(mocks::nft_contract());
        let token_code = app.store_code(mocks::token_contract());
        let oracle_code = app.store_code(mocks::oracle_contract());
        let market_code = app.store_code(mocks::auction_house());

        let nft = app
            .instantiate_contract(
                nft_code,
                addr("minter"),
                &nft::InstantiateMsg {
                    tokens: (1..=3).map(|id| (id.to_string(), "seller".to_string())).collect(),
                },
                &[],
                "nft",
                None,
            )
            .unwrap();
        let token = app
            .instantiate_contract(
                token_code,
                addr("minter"),
                &token::InstantiateMsg {
                    balances: vec![
                        ("bidder_a".to_string(), Uint128::new(START_BALANCE)),
                        ("bidder_b".to_string(), Uint128::new(START_BALANCE)),
                    ],
                },
                &[],
                "token",
                None,
            )
            .unwrap();
        let oracle =
            app.instantiate_contract(oracle_code, addr("feeder"), &Empty {}, &[], "oracle", None)
                .unwrap();

        let market = app
            .instantiate_contract(
                market_code,
                addr("creator"),
                &InstantiateMsg {
                    owner: Some("owner".to_string()),
                    fee_recipient: "fee_collector".to_string(),
                    oracle: oracle.to_string(),
                    native_denom: NATIVE.to_string(),
                    native_decimals: 6,
                    max_price_age: None,
                },
                &[],
                "auction-house",
                None,
            )
            .unwrap();

        let mut suite = Suite {
            app,
            market,
            nft,
            token,
            oracle,
        };
        suite.publish_prices();

        suite
            .app
            .execute_contract(
                addr("seller"),
                suite.nft.clone(),
                &Cw721ExecuteMsg::ApproveAll {
                    operator: suite.market.to_string(),
                    expires: None,
                },
                &[],
            )
            .unwrap();
        for bidder in ["bidder_a", "bidder_b"] {
            suite
                .app
                .execute_contract(
                    addr(bidder),
                    suite.token.clone(),
                    &token::ExecuteMsg::IncreaseAllowance {
                        spender: suite.market.to_string(),
                        amount: Uint128::new(START_BALANCE),
                    },
                    &[],
                )
                .unwrap();
        }

        suite
    }

    fn publish_prices(&mut self) {
        let token = self.token.to_string();
        for (asset, price) in [(NATIVE, 150_000_000_000i128), (token.as_str(), 100_000_000)] {
            self.app
                .execute_contract(
                    addr("feeder"),
                    self.oracle.clone(),
                    &oracle::ExecuteMsg::SetPrice {
                        asset: asset.to_string(),
                        price: Int128::new(price),
                        decimals: 8,
                    },
                    &[],
                )
                .unwrap();
        }
    }

    /// Moves past the end of a one day auction and refreshes the feeds
    fn expire(&mut self) {
        self.app.update_block(|block| {
            block.time = block.time.plus_seconds(DAY + 1);
            block.height += DAY / 5;
        });
        self.publish_prices();
    }

    fn create(
        &mut self,
        token_id: &str,
        payment_token: Option<&Addr>,
    ) -> Result<AppResponse, ContractError> {
        self.execute(
            "seller",
            &ExecuteMsg::CreateAuction {
                nft_contract: self.nft.to_string(),
                token_id: token_id.to_string(),
                start_price: Uint128::new(1_000_000),
                duration: DAY,
                payment_token: payment_token.map(Addr::to_string),
            },
            &[],
        )
    }

    fn bid(
        &mut self,
        bidder: &str,
        auction_id: u64,
        amount: u128,
    ) -> Result<AppResponse, ContractError> {
        self.execute(
            bidder,
            &ExecuteMsg::Bid {
                auction_id,
            },
            &coins(amount, NATIVE),
        )
    }

    fn bid_with_token(
        &mut self,
        bidder: &str,
        auction_id: u64,
        amount: u128,
    ) -> Result<AppResponse, ContractError> {
        self.execute(
            bidder,
            &ExecuteMsg::BidWithToken {
                auction_id,
                amount: Uint128::new(amount),
            },
            &[],
        )
    }

    fn end(&mut self, sender: &str, auction_id: u64) -> Result<AppResponse, ContractError> {
        self.execute(
            sender,
            &ExecuteMsg::EndAuction {
                auction_id,
            },
            &[],
        )
    }

    /// Executes on the auction house, surfacing its own error type
    fn execute(
        &mut self,
        sender: &str,
        msg: &ExecuteMsg,
        funds: &[Coin],
    ) -> Result<AppResponse, ContractError> {
        self.app
            .execute_contract(addr(sender), self.market.clone(), msg, funds)
            .map_err(|err| err.downcast::<ContractError>().unwrap())
    }

    fn auction(&self, auction_id: u64) -> Auction {
        self.app
            .wrap()
            .query_wasm_smart(
                &self.market,
                &QueryMsg::Auction {
                    auction_id,
                },
            )
            .unwrap()
    }

    fn nft_owner(&self, token_id: &str) -> String {
        let res: OwnerOfResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.nft,
                &Cw721QueryMsg::OwnerOf {
                    token_id: token_id.to_string(),
                    include_expired: None,
                },
            )
            .unwrap();
        res.owner
    }

    fn native_balance(&self, address: &str) -> u128 {
        self.app.wrap().query_balance(address, NATIVE).unwrap().amount.u128()
    }

    fn token_balance(&self, address: &str) -> u128 {
        let res: BalanceResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.token,
                &Cw20QueryMsg::Balance {
                    address: address.to_string(),
                },
            )
            .unwrap();
        res.balance.u128()
    }
}

#[test]
fn native_auction_end_to_end() {
    let mut suite = Suite::new();

    suite.create("1", None).unwrap();
    assert_eq!(suite.nft_owner("1"), suite.market.to_string());

    suite.bid("bidder_a", 0, 1_500_000).unwrap();
    assert_eq!(suite.native_balance("bidder_a"), START_BALANCE - 1_500_000);

    // outbidding refunds the previous bidder in the same transaction
    suite.bid("bidder_b", 0, 2_000_000).unwrap();
    assert_eq!(suite.native_balance("bidder_a"), START_BALANCE);
    assert_eq!(suite.native_balance(suite.market.as_str()), 2_000_000);

    let err = suite.end("seller", 0).unwrap_err();
    assert!(matches!(err, ContractError::AuctionStillOpen { .. }));

    suite.expire();
    suite.end("seller", 0).unwrap();

    assert_eq!(suite.nft_owner("1"), "bidder_b");
    assert_eq!(suite.native_balance("seller"), 1_940_000);
    assert_eq!(suite.native_balance("fee_collector"), 60_000);
    assert_eq!(suite.native_balance("bidder_b"), START_BALANCE - 2_000_000);
    assert_eq!(suite.native_balance(suite.market.as_str()), 0);
    assert!(suite.auction(0).ended);

    let err = suite.end("owner", 0).unwrap_err();
    assert_eq!(err, ContractError::AuctionAlreadyEnded {});
}

#[test]
fn unsold_auction_returns_nft() {
    let mut suite = Suite::new();
    suite.create("1", None).unwrap();

    suite.expire();
    suite.end("seller", 0).unwrap();

    assert_eq!(suite.nft_owner("1"), "seller");
    assert_eq!(suite.native_balance("fee_collector"), 0);
}

#[test]
fn listing_without_approval_fails() {
    let mut suite = Suite::new();
    suite
        .app
        .execute_contract(
            addr("seller"),
            suite.nft.clone(),
            &Cw721ExecuteMsg::TransferNft {
                recipient: "collector".to_string(),
                token_id: "2".to_string(),
            },
            &[],
        )
        .unwrap();

    // collector owns the token but never approved the auction house
    let msg = ExecuteMsg::CreateAuction {
        nft_contract: suite.nft.to_string(),
        token_id: "2".to_string(),
        start_price: Uint128::new(1),
        duration: DAY,
        payment_token: None,
    };
    let err = suite.execute("collector", &msg, &[]).unwrap_err();
    assert!(matches!(err, ContractError::TransferFailed { .. }));

    assert_eq!(suite.nft_owner("2"), "collector");
    let auctions: Vec<u64> =
        suite.app.wrap().query_wasm_smart(&suite.market, &QueryMsg::ActiveAuctions {}).unwrap();
    assert!(auctions.is_empty());
}

#[test]
fn send_nft_lists_the_token() {
    let mut suite = Suite::new();

    suite
        .app
        .execute_contract(
            addr("seller"),
            suite.nft.clone(),
            &Cw721ExecuteMsg::SendNft {
                contract: suite.market.to_string(),
                token_id: "3".to_string(),
                msg: to_json_binary(&ReceiveNftMsg::CreateAuction {
                    start_price: Uint128::new(100),
                    duration: DAY,
                    payment_token: None,
                })
                .unwrap(),
            },
            &[],
        )
        .unwrap();

    assert_eq!(suite.nft_owner("3"), suite.market.to_string());
    let auction = suite.auction(0);
    assert_eq!(auction.seller, addr("seller"));
    assert_eq!(auction.token_id, "3");
    assert_eq!(auction.start_price, Uint128::new(100));
}

#[test]
fn direct_receive_nft_call_is_rejected() {
    let mut suite = Suite::new();

    let listing = ExecuteMsg::ReceiveNft(Cw721ReceiveMsg {
        sender: "seller".to_string(),
        token_id: "1".to_string(),
        msg: to_json_binary(&ReceiveNftMsg::CreateAuction {
            start_price: Uint128::new(100),
            duration: DAY,
            payment_token: None,
        })
        .unwrap(),
    });

    // a plain account posing as the collection
    let err = suite.execute("mallory", &listing, &[]).unwrap_err();
    assert!(matches!(err, ContractError::TransferFailed { .. }));

    // the real collection address, but the token never arrived
    let nft = suite.nft.to_string();
    let err = suite.execute(&nft, &listing, &[]).unwrap_err();
    assert_eq!(
        err,
        ContractError::TransferFailed {
            reason: "token 1 is not held by the auction house".to_string()
        }
    );

    assert_eq!(suite.nft_owner("1"), "seller");
    let auctions: Vec<u64> =
        suite.app.wrap().query_wasm_smart(&suite.market, &QueryMsg::ActiveAuctions {}).unwrap();
    assert!(auctions.is_empty());

    // nothing to bid on
    let err = suite.bid("bidder_a", 0, 1_500_000).unwrap_err();
    assert_eq!(
        err,
        ContractError::AuctionNotFound {
            auction_id: 0
        }
    );
    assert_eq!(suite.native_balance("bidder_a"), START_BALANCE);
}

#[test]
fn wrong_asset_moves_no_funds() {
    let mut suite = Suite::new();
    let token = suite.token.clone();
    suite.create("1", Some(&token)).unwrap();

    let err = suite.bid("bidder_a", 0, 2_000_000).unwrap_err();
    assert_eq!(err, ContractError::InvalidPaymentToken {});

    assert_eq!(suite.native_balance("bidder_a"), START_BALANCE);
    assert_eq!(suite.native_balance(suite.market.as_str()), 0);
    assert_eq!(suite.auction(0).highest_bidder, None);
}

#[test]
fn token_auction_end_to_end() {
    let mut suite = Suite::new();
    let token = suite.token.clone();
    suite.create("2", Some(&token)).unwrap();

    suite.bid_with_token("bidder_a", 0, 1_500_000).unwrap();
    assert_eq!(suite.token_balance("bidder_a"), START_BALANCE - 1_500_000);

    // bid through cw20 Send
    suite
        .app
        .execute_contract(
            addr("bidder_b"),
            suite.token.clone(),
            &token::ExecuteMsg::Send {
                contract: suite.market.to_string(),
                amount: Uint128::new(2_000_000),
                msg: to_json_binary(&ReceiveTokenMsg::Bid {
                    auction_id: 0,
                })
                .unwrap(),
            },
            &[],
        )
        .unwrap();
    assert_eq!(suite.token_balance("bidder_a"), START_BALANCE);
    assert_eq!(suite.token_balance(suite.market.as_str()), 2_000_000);

    suite.expire();
    suite.end("owner", 0).unwrap();

    // $2 is under the $10 minimum, the default 2% applies
    assert_eq!(suite.nft_owner("2"), "bidder_b");
    assert_eq!(suite.token_balance("seller"), 1_960_000);
    assert_eq!(suite.token_balance("fee_collector"), 40_000);
    assert_eq!(suite.token_balance(suite.market.as_str()), 0);
}

#[test]
fn failed_refund_reverts_the_bid() {
    let mut suite = Suite::new();
    let token = suite.token.clone();
    suite.create("2", Some(&token)).unwrap();
    suite.bid_with_token("bidder_a", 0, 1_500_000).unwrap();

    suite
        .app
        .execute_contract(
            addr("minter"),
            suite.token.clone(),
            &token::ExecuteMsg::SetBlocked {
                address: "bidder_a".to_string(),
                blocked: true,
            },
            &[],
        )
        .unwrap();

    let err = suite.bid_with_token("bidder_b", 0, 2_000_000).unwrap_err();
    assert!(matches!(err, ContractError::RefundFailed { .. }));

    // nothing moved, the first bid stands
    assert_eq!(suite.token_balance("bidder_b"), START_BALANCE);
    assert_eq!(suite.token_balance(suite.market.as_str()), 1_500_000);
    let auction = suite.auction(0);
    assert_eq!(auction.highest_bidder, Some(addr("bidder_a")));
    assert_eq!(auction.highest_bid, Uint128::new(1_500_000));

    // the lock didn't leak out of the failed transaction
    suite
        .app
        .execute_contract(
            addr("minter"),
            suite.token.clone(),
            &token::ExecuteMsg::SetBlocked {
                address: "bidder_a".to_string(),
                blocked: false,
            },
            &[],
        )
        .unwrap();
    suite.bid_with_token("bidder_b", 0, 2_000_000).unwrap();
    assert_eq!(suite.token_balance("bidder_a"), START_BALANCE);
}

#[test]
fn reentrant_token_callback_is_rejected() {
    let mut suite = Suite::new();
    let token = suite.token.clone();
    suite.create("2", Some(&token)).unwrap();

    // every token transfer calls back into the auction house with a higher bid
    let callback = ExecuteMsg::Receive(Cw20ReceiveMsg {
        sender: "bidder_b".to_string(),
        amount: Uint128::new(5_000_000),
        msg: to_json_binary(&ReceiveTokenMsg::Bid {
            auction_id: 0,
        })
        .unwrap(),
    });
    let set_hook = |hook: Option<Hook>| token::ExecuteMsg::SetHook {
        hook,
    };
    suite
        .app
        .execute_contract(
            addr("mallory"),
            suite.token.clone(),
            &set_hook(Some(Hook {
                contract: suite.market.to_string(),
                msg: to_json_binary(&callback).unwrap(),
            })),
            &[],
        )
        .unwrap();

    let err = suite.bid_with_token("bidder_a", 0, 1_500_000).unwrap_err();
    assert!(matches!(err, ContractError::TransferFailed { .. }));

    assert_eq!(suite.token_balance("bidder_a"), START_BALANCE);
    assert_eq!(suite.auction(0).highest_bidder, None);

    suite.app.execute_contract(addr("mallory"), suite.token.clone(), &set_hook(None), &[]).unwrap();
    suite.bid_with_token("bidder_a", 0, 1_500_000).unwrap();
    assert_eq!(suite.auction(0).highest_bidder, Some(addr("bidder_a")));
}

#[test]
fn emergency_cancel_refunds_and_returns_nft() {
    let mut suite = Suite::new();
    suite.create("1", None).unwrap();
    suite.bid("bidder_a", 0, 1_500_000).unwrap();

    let cancel = ExecuteMsg::EmergencyCancel {
        auction_id: 0,
    };
    let err = suite.execute("seller", &cancel, &[]).unwrap_err();
    assert!(matches!(err, ContractError::Ownership(_)));

    suite.execute("owner", &cancel, &[]).unwrap();

    assert_eq!(suite.native_balance("bidder_a"), START_BALANCE);
    assert_eq!(suite.native_balance(suite.market.as_str()), 0);
    assert_eq!(suite.nft_owner("1"), "seller");

    let err = suite.bid("bidder_b", 0, 2_000_000).unwrap_err();
    assert_eq!(err, ContractError::AuctionHasEnded {});
    assert_eq!(suite.native_balance("bidder_b"), START_BALANCE);
}

#[test]
fn payout_to_blocked_seller_keeps_auction_open_for_retry() {
    let mut suite = Suite::new();
    let token = suite.token.clone();
    suite.create("2", Some(&token)).unwrap();
    suite.bid_with_token("bidder_a", 0, 1_500_000).unwrap();

    let block = |blocked: bool| token::ExecuteMsg::SetBlocked {
        address: "seller".to_string(),
        blocked,
    };
    suite.app.execute_contract(addr("minter"), suite.token.clone(), &block(true), &[]).unwrap();

    suite.expire();
    let err = suite.end("seller", 0).unwrap_err();
    assert!(matches!(err, ContractError::TransferFailed { .. }));
    assert!(!suite.auction(0).ended);
    assert_eq!(suite.nft_owner("2"), suite.market.to_string());

    suite.app.execute_contract(addr("minter"), suite.token.clone(), &block(false), &[]).unwrap();
    suite.end("seller", 0).unwrap();
    assert_eq!(suite.nft_owner("2"), "bidder_a");
    assert_eq!(suite.token_balance("seller"), 1_470_000);
    assert_eq!(suite.token_balance("fee_collector"), 30_000);
}
