//! Converts quote denominated farm values into USD using the chain's
//! reference pair.

use {
    crate::{config::ReferenceLp, fetching::Farm},
    bigdecimal::BigDecimal,
    num::{One, Zero},
    serde::Serialize,
};

/// A farm with its values expressed in USD.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedFarm {
    #[serde(flatten)]
    pub farm: Farm,
    pub token_price_usd: BigDecimal,
    pub quote_token_price_usd: BigDecimal,
    pub lp_value_usd: BigDecimal,
}

/// Turns a raw farm list into a USD priced one.
pub trait PriceResolving: Send + Sync {
    fn resolve(&self, farms: Vec<Farm>, reference: &ReferenceLp) -> Vec<PricedFarm>;
}

/// Prices farms off the chain's native/stable reference pair. The stable
/// token is assumed to trade at 1 USD, the native token is priced through
/// the reference farm, and every other quote token through at most one
/// intermediate farm. Quote tokens with no route price at zero.
#[derive(Clone, Debug, Default)]
pub struct ReferencePairResolver;

impl PriceResolving for ReferencePairResolver {
    fn resolve(&self, farms: Vec<Farm>, reference: &ReferenceLp) -> Vec<PricedFarm> {
        let native_price = native_price_usd(&farms, reference);
        let quote_prices: Vec<_> = farms
            .iter()
            .map(|farm| quote_price_usd(farm, &farms, reference, &native_price))
            .collect();
        farms
            .into_iter()
            .zip(quote_prices)
            .map(|(farm, quote_price)| {
                let token_price_usd = &farm.metrics.token_price_vs_quote * &quote_price;
                let lp_value_usd = &farm.metrics.lp_total_in_quote_token * &quote_price;
                PricedFarm {
                    farm,
                    token_price_usd,
                    quote_token_price_usd: quote_price,
                    lp_value_usd,
                }
            })
            .collect()
    }
}

/// USD price of the native token, read off the reference farm. The pair may
/// list the native token on either side.
fn native_price_usd(farms: &[Farm], reference: &ReferenceLp) -> BigDecimal {
    let Some(farm) = farms
        .iter()
        .find(|farm| farm.config.lp_address == reference.address)
    else {
        return BigDecimal::zero();
    };
    let price = &farm.metrics.token_price_vs_quote;
    if farm.config.token.symbol == reference.native_symbol {
        price.clone()
    } else if farm.config.quote_token.symbol == reference.native_symbol && !price.is_zero() {
        BigDecimal::one() / price
    } else {
        BigDecimal::zero()
    }
}

fn quote_price_usd(
    farm: &Farm,
    farms: &[Farm],
    reference: &ReferenceLp,
    native_price: &BigDecimal,
) -> BigDecimal {
    let quote = &farm.config.quote_token.symbol;
    if *quote == reference.stable_symbol {
        return BigDecimal::one();
    }
    if *quote == reference.native_symbol {
        return native_price.clone();
    }
    // One hop: a farm whose base token is our quote token and whose own
    // quote is directly priceable.
    farms
        .iter()
        .find_map(|hop| {
            if hop.config.token.symbol != *quote {
                return None;
            }
            let hop_price = &hop.metrics.token_price_vs_quote;
            if hop.config.quote_token.symbol == reference.stable_symbol {
                Some(hop_price.clone())
            } else if hop.config.quote_token.symbol == reference.native_symbol {
                Some(hop_price * native_price)
            } else {
                None
            }
        })
        .unwrap_or_else(BigDecimal::zero)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            config::{FarmConfig, FarmToken, PoolKind},
            metrics::{FarmAllocation, FarmMetrics},
        },
        alloy::primitives::Address,
    };

    fn reference() -> ReferenceLp {
        ReferenceLp {
            address: Address::with_last_byte(77),
            native_symbol: "WCORE".to_string(),
            stable_symbol: "USDT".to_string(),
        }
    }

    fn farm(
        lp_address: Address,
        token: &str,
        quote: &str,
        token_price_vs_quote: BigDecimal,
    ) -> Farm {
        Farm {
            config: FarmConfig {
                pid: Some(1),
                lp_symbol: format!("{token}-{quote} LP"),
                lp_address,
                token: FarmToken {
                    address: Address::with_last_byte(11),
                    symbol: token.to_string(),
                    decimals: 18,
                },
                quote_token: FarmToken {
                    address: Address::with_last_byte(12),
                    symbol: quote.to_string(),
                    decimals: 18,
                },
                kind: PoolKind::Classic,
            },
            metrics: FarmMetrics {
                token_amount_total: BigDecimal::zero(),
                quote_token_amount_total: BigDecimal::zero(),
                lp_total_supply: BigDecimal::zero(),
                lp_total_in_quote_token: BigDecimal::from(10),
                token_price_vs_quote,
            },
            allocation: FarmAllocation {
                pool_weight: BigDecimal::zero(),
                multiplier: "0X".to_string(),
            },
        }
    }

    #[test]
    fn native_price_comes_from_the_reference_farm() {
        let farms = vec![farm(
            reference().address,
            "WCORE",
            "USDT",
            BigDecimal::from(2),
        )];
        let priced = ReferencePairResolver.resolve(farms, &reference());

        assert_eq!(priced[0].token_price_usd, BigDecimal::from(2));
        assert_eq!(priced[0].quote_token_price_usd, BigDecimal::one());
        assert_eq!(priced[0].lp_value_usd, BigDecimal::from(10));
    }

    #[test]
    fn reversed_reference_pair_prices_through_the_reciprocal() {
        // The reference pair lists USDT as base and WCORE as quote, so the
        // native price is the reciprocal of the farm's base price.
        let farms = vec![
            farm(
                reference().address,
                "USDT",
                "WCORE",
                BigDecimal::new(5.into(), 1),
            ),
            farm(Address::with_last_byte(20), "AAA", "WCORE", BigDecimal::from(4)),
        ];
        let priced = ReferencePairResolver.resolve(farms, &reference());

        assert_eq!(priced[1].quote_token_price_usd, BigDecimal::from(2));
        assert_eq!(priced[1].token_price_usd, BigDecimal::from(8));
    }

    #[test]
    fn stable_quoted_farms_price_at_face_value() {
        let farms = vec![farm(
            Address::with_last_byte(20),
            "AAA",
            "USDT",
            BigDecimal::from(3),
        )];
        let priced = ReferencePairResolver.resolve(farms, &reference());

        assert_eq!(priced[0].quote_token_price_usd, BigDecimal::one());
        assert_eq!(priced[0].token_price_usd, BigDecimal::from(3));
        assert_eq!(priced[0].lp_value_usd, BigDecimal::from(10));
    }

    #[test]
    fn exotic_quotes_route_through_one_hop() {
        let farms = vec![
            farm(
                reference().address,
                "WCORE",
                "USDT",
                BigDecimal::from(2),
            ),
            // BBB is priced against USDT directly.
            farm(Address::with_last_byte(20), "BBB", "USDT", BigDecimal::from(3)),
            // CCC is priced against the native token.
            farm(Address::with_last_byte(21), "CCC", "WCORE", BigDecimal::from(4)),
            farm(Address::with_last_byte(22), "AAA", "BBB", BigDecimal::from(5)),
            farm(Address::with_last_byte(23), "DDD", "CCC", BigDecimal::from(6)),
        ];
        let priced = ReferencePairResolver.resolve(farms, &reference());

        // AAA-BBB: BBB hops through its USDT farm.
        assert_eq!(priced[3].quote_token_price_usd, BigDecimal::from(3));
        assert_eq!(priced[3].token_price_usd, BigDecimal::from(15));
        // DDD-CCC: CCC hops through its WCORE farm at 4 * 2 USD.
        assert_eq!(priced[4].quote_token_price_usd, BigDecimal::from(8));
        assert_eq!(priced[4].token_price_usd, BigDecimal::from(48));
    }

    #[test]
    fn unroutable_quotes_price_at_zero() {
        let farms = vec![farm(
            Address::with_last_byte(20),
            "AAA",
            "ZZZ",
            BigDecimal::from(5),
        )];
        let priced = ReferencePairResolver.resolve(farms, &reference());

        assert_eq!(priced[0].quote_token_price_usd, BigDecimal::zero());
        assert_eq!(priced[0].token_price_usd, BigDecimal::zero());
        assert_eq!(priced[0].lp_value_usd, BigDecimal::zero());
    }

    #[test]
    fn missing_reference_farm_zeroes_native_quotes() {
        let farms = vec![farm(
            Address::with_last_byte(20),
            "AAA",
            "WCORE",
            BigDecimal::from(4),
        )];
        let priced = ReferencePairResolver.resolve(farms, &reference());

        assert_eq!(priced[0].quote_token_price_usd, BigDecimal::zero());
        assert_eq!(priced[0].token_price_usd, BigDecimal::zero());
    }
}
