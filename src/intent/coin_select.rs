//! Greedy coin selection over paginated coin listings.

use std::collections::HashSet;

use tracing::trace;

use crate::client::{Coin, SuiClient};
use crate::error::WasmSuiError;
use crate::types::{ObjectId, SuiAddress};

/// Take coins from one page, largest first, until `remaining` is covered.
fn take_from_page(
    mut page: Vec<Coin>,
    remaining: &mut u128,
    exclude: &HashSet<ObjectId>,
    selected: &mut Vec<Coin>,
) {
    page.sort_by(|a, b| b.balance.cmp(&a.balance));
    for coin in page {
        if *remaining == 0 {
            break;
        }
        if exclude.contains(&coin.coin_object_id) {
            continue;
        }
        trace!(coin = %coin.coin_object_id, balance = coin.balance, "selected coin");
        *remaining = remaining.saturating_sub(u128::from(coin.balance));
        selected.push(coin);
    }
}

/// Select coins of `coin_type` owned by `owner` whose balances sum to at
/// least `amount`, skipping any id in `exclude`.
///
/// Pages are fetched one at a time and each page is consumed largest coin
/// first. Running out of pages before `amount` is covered fails with
/// [`WasmSuiError::InsufficientFunds`].
pub async fn select_coins(
    client: &dyn SuiClient,
    owner: SuiAddress,
    coin_type: &str,
    amount: u128,
    exclude: &HashSet<ObjectId>,
) -> Result<Vec<Coin>, WasmSuiError> {
    let mut remaining = amount;
    let mut selected = Vec::new();
    let mut cursor = None;

    while remaining > 0 {
        let page = client.get_coins(owner, coin_type, cursor).await?;
        take_from_page(page.data, &mut remaining, exclude, &mut selected);
        if remaining == 0 {
            break;
        }
        cursor = match (page.has_next_page, page.next_cursor) {
            (true, Some(next)) => Some(next),
            _ => {
                return Err(WasmSuiError::InsufficientFunds {
                    coin_type: coin_type.to_string(),
                    owner: owner.to_string(),
                })
            }
        };
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::test_utils::MockClient;

    const USDC: &str = "0xa::usdc::USDC";

    fn owner() -> SuiAddress {
        SuiAddress::from_short(0xab)
    }

    fn balances(coins: &[Coin]) -> Vec<u64> {
        coins.iter().map(|c| c.balance).collect()
    }

    async fn select(client: &MockClient, amount: u128) -> Result<Vec<Coin>, WasmSuiError> {
        select_coins(client, owner(), USDC, amount, &HashSet::new()).await
    }

    #[tokio::test]
    async fn test_single_largest_coin() {
        let client = MockClient::new().with_coins(owner(), USDC, &[[10, 5, 3, 1].as_slice()]);
        assert_eq!(balances(&select(&client, 7).await.unwrap()), vec![10]);
    }

    #[tokio::test]
    async fn test_accumulates_descending() {
        let client = MockClient::new().with_coins(owner(), USDC, &[[1, 3, 5].as_slice()]);
        assert_eq!(balances(&select(&client, 8).await.unwrap()), vec![5, 3]);
    }

    #[tokio::test]
    async fn test_insufficient() {
        let client = MockClient::new().with_coins(owner(), USDC, &[[5, 3, 1].as_slice()]);
        let err = select(&client, 20).await.unwrap_err();
        assert_eq!(
            err,
            WasmSuiError::InsufficientFunds {
                coin_type: USDC.to_string(),
                owner: owner().to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_walks_pages_in_order() {
        // second page holds the big coin, but the first page is used up first
        let client =
            MockClient::new().with_coins(owner(), USDC, &[[2, 4].as_slice(), [100].as_slice()]);
        assert_eq!(balances(&select(&client, 7).await.unwrap()), vec![4, 2, 100]);
    }

    #[tokio::test]
    async fn test_excluded_coins_skipped() {
        let client = MockClient::new().with_coins(owner(), USDC, &[[10, 5, 3].as_slice()]);
        let largest = client.coins(owner(), USDC)[0].coin_object_id;
        let exclude = HashSet::from([largest]);
        let selected = select_coins(&client, owner(), USDC, 7, &exclude).await.unwrap();
        assert_eq!(balances(&selected), vec![5, 3]);
    }

    #[tokio::test]
    async fn test_zero_amount_fetches_nothing() {
        let client = MockClient::new();
        assert!(select(&client, 0).await.unwrap().is_empty());
    }
}
