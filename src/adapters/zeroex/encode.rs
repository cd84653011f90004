//! Fill and cancel calldata for the 0x v4 NFT protocol.
//!
//! The fill entrypoints are direction-dependent: a taker fills a listing
//! (`SellNft`) by calling the buy function and fills a bid (`BuyNft`) by
//! calling the sell function. Cancels invalidate the order's nonce for
//! the maker, so no signature is needed.

use alloy::primitives::Bytes;
use alloy::sol;
use alloy::sol_types::SolCall;
use anyhow::{Context, Result, bail, ensure};

use crate::domain::native::{NftStandard, TradeDirection, ZeroExNftOrder};

use super::builder::direction_code;

sol! {
    struct Fee {
        address recipient;
        uint256 amount;
        bytes feeData;
    }

    struct Property {
        address propertyValidator;
        bytes propertyData;
    }

    struct Signature {
        uint8 signatureType;
        uint8 v;
        bytes32 r;
        bytes32 s;
    }

    struct ERC721Order {
        uint8 direction;
        address maker;
        address taker;
        uint256 expiry;
        uint256 nonce;
        address erc20Token;
        uint256 erc20TokenAmount;
        Fee[] fees;
        address erc721Token;
        uint256 erc721TokenId;
        Property[] erc721TokenProperties;
    }

    struct ERC1155Order {
        uint8 direction;
        address maker;
        address taker;
        uint256 expiry;
        uint256 nonce;
        address erc20Token;
        uint256 erc20TokenAmount;
        Fee[] fees;
        address erc1155Token;
        uint256 erc1155TokenId;
        Property[] erc1155TokenProperties;
        uint128 erc1155TokenAmount;
    }

    function buyERC721(ERC721Order sellOrder, Signature signature, bytes callbackData);
    function sellERC721(
        ERC721Order buyOrder,
        Signature signature,
        uint256 erc721TokenId,
        bool unwrapNativeToken,
        bytes callbackData
    );
    function cancelERC721Order(uint256 orderNonce);

    function buyERC1155(
        ERC1155Order sellOrder,
        Signature signature,
        uint128 erc1155BuyAmount,
        bytes callbackData
    );
    function sellERC1155(
        ERC1155Order buyOrder,
        Signature signature,
        uint256 erc1155TokenId,
        uint128 erc1155SellAmount,
        bool unwrapNativeToken,
        bytes callbackData
    );
    function cancelERC1155Order(uint256 orderNonce);
}

/// EIP-712 signature type tag, per the protocol's `LibSignature`.
const SIGNATURE_TYPE_EIP712: u8 = 2;

fn parse_signature(order: &ZeroExNftOrder) -> Result<Signature> {
    let raw = order
        .signature
        .as_ref()
        .context("order carries no signature; it cannot be filled")?;
    ensure!(
        raw.len() == 65,
        "malformed signature: expected 65 bytes, got {}",
        raw.len()
    );
    Ok(Signature {
        signatureType: SIGNATURE_TYPE_EIP712,
        v: raw[64],
        r: <[u8; 32]>::try_from(&raw[0..32])?.into(),
        s: <[u8; 32]>::try_from(&raw[32..64])?.into(),
    })
}

fn sol_fees(order: &ZeroExNftOrder) -> Vec<Fee> {
    order
        .fees
        .iter()
        .map(|f| Fee {
            recipient: f.recipient,
            amount: f.amount,
            feeData: Bytes::new(),
        })
        .collect()
}

fn sol_erc721_order(order: &ZeroExNftOrder) -> ERC721Order {
    ERC721Order {
        direction: direction_code(order.direction),
        maker: order.maker,
        taker: order.taker,
        expiry: order.expiry,
        nonce: order.nonce,
        erc20Token: order.erc20_token,
        erc20TokenAmount: order.erc20_token_amount,
        fees: sol_fees(order),
        erc721Token: order.nft_token,
        erc721TokenId: order.nft_token_id,
        erc721TokenProperties: Vec::new(),
    }
}

fn sol_erc1155_order(order: &ZeroExNftOrder) -> Result<(ERC1155Order, u128)> {
    let amount = u128::try_from(order.nft_token_amount)
        .map_err(|_| anyhow::anyhow!("ERC1155 token amount exceeds uint128"))?;
    Ok((
        ERC1155Order {
            direction: direction_code(order.direction),
            maker: order.maker,
            taker: order.taker,
            expiry: order.expiry,
            nonce: order.nonce,
            erc20Token: order.erc20_token,
            erc20TokenAmount: order.erc20_token_amount,
            fees: sol_fees(order),
            erc1155Token: order.nft_token,
            erc1155TokenId: order.nft_token_id,
            erc1155TokenProperties: Vec::new(),
            erc1155TokenAmount: amount,
        },
        amount,
    ))
}

/// Calldata that fills `order` from the taker's side.
pub fn fill_calldata(order: &ZeroExNftOrder) -> Result<Vec<u8>> {
    let signature = parse_signature(order)?;
    let calldata = match (order.nft_standard, order.direction) {
        (NftStandard::Erc721, TradeDirection::SellNft) => buyERC721Call {
            sellOrder: sol_erc721_order(order),
            signature,
            callbackData: Bytes::new(),
        }
        .abi_encode(),
        (NftStandard::Erc721, TradeDirection::BuyNft) => sellERC721Call {
            buyOrder: sol_erc721_order(order),
            signature,
            erc721TokenId: order.nft_token_id,
            unwrapNativeToken: false,
            callbackData: Bytes::new(),
        }
        .abi_encode(),
        (NftStandard::Erc1155, TradeDirection::SellNft) => {
            let (sell_order, amount) = sol_erc1155_order(order)?;
            buyERC1155Call {
                sellOrder: sell_order,
                signature,
                erc1155BuyAmount: amount,
                callbackData: Bytes::new(),
            }
            .abi_encode()
        }
        (NftStandard::Erc1155, TradeDirection::BuyNft) => {
            let (buy_order, amount) = sol_erc1155_order(order)?;
            sellERC1155Call {
                buyOrder: buy_order,
                signature,
                erc1155TokenId: order.nft_token_id,
                erc1155SellAmount: amount,
                unwrapNativeToken: false,
                callbackData: Bytes::new(),
            }
            .abi_encode()
        }
    };
    Ok(calldata)
}

/// Calldata that invalidates `order`'s nonce. Maker-only on chain.
pub fn cancel_calldata(order: &ZeroExNftOrder) -> Vec<u8> {
    match order.nft_standard {
        NftStandard::Erc721 => cancelERC721OrderCall {
            orderNonce: order.nonce,
        }
        .abi_encode(),
        NftStandard::Erc1155 => cancelERC1155OrderCall {
            orderNonce: order.nonce,
        }
        .abi_encode(),
    }
}

/// Fill target validity check used before submission.
pub fn ensure_fillable(order: &ZeroExNftOrder) -> Result<()> {
    if order.signature.is_none() {
        bail!("order carries no signature; it cannot be filled");
    }
    Ok(())
}
