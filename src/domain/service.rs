// ドメインサービス
// 集約にまたがる純粋なビジネスロジック（引当と集計）を実装
// 永続化への書き込みは行わない。スナップショット上で計算し、
// 実際の在庫減算は呼び出し側（決済コーディネーター）が適用する

use crate::domain::error::DomainError;
use crate::domain::model::{BatchAllocation, Money, ProductId, SaleItem, StockBatch};

/// 引当エンジン
/// 1つの要求明細に対して、在庫バッチをFIFO順（入荷日時の昇順）に
/// 引き当てる。標準的な先入れ先出しの在庫原価計算に一致する
///
/// # Arguments
/// * `product_id` - 対象の商品ID（エラー報告に使用）
/// * `batches` - 商品の在庫バッチのスナップショット
/// * `requested_quantity` - 要求数量（1以上）
///
/// # Returns
/// * `Ok(Vec<BatchAllocation>)` - 要求数量を満たす引当のリスト
/// * `Err(DomainError::InsufficientStock)` - 全バッチの残数合計が不足
///
/// 事前条件として残数合計を先に検査するため、部分的に引き当ててから
/// 失敗することはない（明細単位で全量か無かのいずれか）
pub fn allocate(
    product_id: ProductId,
    batches: &[StockBatch],
    requested_quantity: u32,
) -> Result<Vec<BatchAllocation>, DomainError> {
    if requested_quantity == 0 {
        return Err(DomainError::InvalidQuantity);
    }

    let available: u32 = batches
        .iter()
        .map(|batch| batch.remaining_quantity())
        .sum();
    if available < requested_quantity {
        return Err(DomainError::InsufficientStock {
            product_id,
            requested: requested_quantity,
            available,
        });
    }

    // 入荷日時の昇順（最も古いバッチから）に並べる
    let mut sorted: Vec<&StockBatch> = batches.iter().collect();
    sorted.sort_by_key(|batch| batch.added_at());

    let mut allocations = Vec::new();
    let mut remaining_request = requested_quantity;
    for batch in sorted {
        if remaining_request == 0 {
            break;
        }
        let taken = remaining_request.min(batch.remaining_quantity());
        // 残数ゼロのバッチは引当に寄与しない
        if taken == 0 {
            continue;
        }
        allocations.push(BatchAllocation::new(batch.id(), taken, batch.selling_price()));
        remaining_request -= taken;
    }

    Ok(allocations)
}

/// 販売集計
/// 明細ごとの引当結果を販売明細と合計金額に変換する
/// 金額はコボ（最小通貨単位）の整数演算で、丸め誤差は発生しない
///
/// # Arguments
/// * `allocated_lines` - (商品ID, その明細の引当リスト) の列
///
/// # Returns
/// * `Ok((Money, Vec<SaleItem>))` - 合計金額と販売明細のリスト
pub fn aggregate(
    allocated_lines: &[(ProductId, Vec<BatchAllocation>)],
) -> Result<(Money, Vec<SaleItem>), DomainError> {
    let mut total = Money::zero();
    let mut items = Vec::new();

    for (product_id, allocations) in allocated_lines {
        for allocation in allocations {
            let item = SaleItem::new(*product_id, allocation.quantity(), allocation.unit_price())?;
            total = total.add(&item.subtotal())?;
            items.push(item);
        }
    }

    Ok((total, items))
}
