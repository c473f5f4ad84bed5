use crate::util::scripts::NetworkScripts;
use acp_sdk::capacity::{minimal_cell_capacity, needs_auxiliary_capacity_cell};
use acp_sdk::cell::{udt_data, LiveCell};
use acp_sdk::cell_collector::{
    collect_all_udt_cells, collect_capacity, collect_capacity_cells, collect_udt_amount,
    collect_udt_cells_by_amount, get_live_cell,
};
use acp_sdk::cell_selector::Selection;
use acp_sdk::chain::{CellQuery, ChainQuery};
use acp_sdk::constants::{MIN_SECP_CELL_CAPACITY, ONE_CKB};
use acp_sdk::fee::{calculate_fee, pay_fee, tx_size};
use acp_sdk::signer::{seal, KeySigner};
use acp_sdk::tx_helper::{TxHelper, TxSkeleton};
use acp_sdk::{Result, TxBuildError};
use ckb_types::{
    bytes::Bytes,
    core::Capacity,
    packed::{CellOutput, Script},
    prelude::*,
    H256,
};
use log::info;

/// 144 CKB occupied by a USDI cell under a 55 bytes lock, plus 0.01 CKB
/// for fees.
pub const ACP_DEFAULT_CAPACITY: u64 = 144 * ONE_CKB + ONE_CKB / 100;

struct UsdiTransfer<'a> {
    from_lockscript: &'a Script,
    selection: &'a Selection,
    amount: u128,
    target: &'a LiveCell,
    target_amount: u128,
}

pub struct Generator<C> {
    pub chain: C,
    pub scripts: NetworkScripts,
    pub fee_rate: u64,
}

impl<C: ChainQuery> Generator<C> {
    pub fn new(chain: C, scripts: NetworkScripts, fee_rate: u64) -> Self {
        Generator {
            chain,
            scripts,
            fee_rate,
        }
    }

    fn usdi_output(&self, lockscript: Script, capacity: u64) -> CellOutput {
        CellOutput::new_builder()
            .capacity(Capacity::shannons(capacity).pack())
            .lock(lockscript)
            .type_(Some(self.scripts.usdi_typescript.clone()).pack())
            .build()
    }

    fn pay_fee(&self, skeleton: TxSkeleton) -> Result<TxSkeleton> {
        let (skeleton, fee) = pay_fee(skeleton, self.fee_rate)?;
        info!(
            "tx fee: {} shannons, change output capacity: {} shannons",
            fee,
            skeleton.change_capacity()
        );
        Ok(skeleton)
    }

    /// `count` empty USDI cells under the acp lock of `lock_args`, each
    /// holding `capacity`, funded by the secp256k1 cells of the same args.
    pub async fn create_acp_cells(
        &self,
        lock_args: Bytes,
        count: usize,
        capacity: u64,
    ) -> Result<TxSkeleton> {
        if count == 0 {
            return Err(TxBuildError::MalformedDraft(
                "acp cell count must be positive".to_string(),
            ));
        }
        let secp_lockscript = self.scripts.secp256k1_lockscript(lock_args.clone());
        let acp_lockscript = self.scripts.acp_lockscript(lock_args);

        let required = capacity
            .checked_mul(count as u64)
            .and_then(|outputs| outputs.checked_add(MIN_SECP_CELL_CAPACITY))
            .ok_or_else(|| {
                TxBuildError::MalformedDraft(format!(
                    "{} acp cells of {} shannons overflow",
                    count, capacity
                ))
            })?;
        let selection =
            collect_capacity_cells(&self.chain, secp_lockscript.clone(), required).await?;
        info!(
            "collected {} capacity cells, total: {} shannons",
            selection.cells.len(),
            selection.total
        );

        let mut helper = TxHelper::default();
        helper.add_inputs(selection.cells);
        for _ in 0..count {
            helper.add_output(
                self.usdi_output(acp_lockscript.clone(), capacity),
                udt_data(0),
            );
        }
        helper.add_change_output(
            CellOutput::new_builder().lock(secp_lockscript.clone()).build(),
            Bytes::new(),
        )?;
        helper.add_cell_deps(vec![
            self.scripts.secp256k1_dep.clone(),
            self.scripts.usdi_dep.clone(),
        ]);
        let skeleton = helper.build(&secp_lockscript)?;
        self.pay_fee(skeleton)
    }

    /// Moves `amount` USDI from the secp256k1 cells of `from_lock_args` into
    /// the existing acp cell of `to_acp_lockscript`.
    ///
    /// The token change output pays the fee when its surplus covers it.
    /// Otherwise plain capacity cells are added until they cover a secp256k1
    /// change cell plus the fee of the enlarged transaction.
    pub async fn transfer_to_acp(
        &self,
        from_lock_args: Bytes,
        to_acp_lockscript: Script,
        amount: u128,
    ) -> Result<TxSkeleton> {
        let usdi_typescript = self.scripts.usdi_typescript.clone();
        let from_lockscript = self.scripts.secp256k1_lockscript(from_lock_args);

        let target = get_live_cell(
            &self.chain,
            CellQuery::typed_cells(to_acp_lockscript.clone(), usdi_typescript.clone()),
        )
        .await?
        .filter(|cell| cell.udt_amount().is_some())
        .ok_or_else(|| {
            TxBuildError::NoMatchingCell(format!(
                "no acp USDI cell found for lock {}",
                to_acp_lockscript
            ))
        })?;
        let target_amount = target
            .udt_amount()
            .unwrap_or(0)
            .checked_add(amount)
            .ok_or_else(|| {
                TxBuildError::MalformedDraft("recipient USDI amount overflows".to_string())
            })?;

        let selection = collect_udt_cells_by_amount(
            &self.chain,
            from_lockscript.clone(),
            usdi_typescript,
            amount,
        )
        .await?;
        info!(
            "collected {} USDI cells, supply: {}, transfer: {}",
            selection.cells.len(),
            selection.total,
            amount
        );
        let transfer = UsdiTransfer {
            from_lockscript: &from_lockscript,
            selection: &selection,
            amount,
            target: &target,
            target_amount,
        };

        let draft = self.transfer_draft(&transfer, vec![])?;
        let mut fee = self.estimate_fee(&draft);
        let change_data_len = draft.outputs_data[draft.change_index].len();
        if !needs_auxiliary_capacity_cell(draft.change_output(), change_data_len, fee)? {
            return self.pay_fee(draft);
        }

        let plain_change = CellOutput::new_builder().lock(from_lockscript.clone()).build();
        let plain_change_capacity = minimal_cell_capacity(&plain_change, 0)?;
        loop {
            let auxiliary = collect_capacity_cells(
                &self.chain,
                from_lockscript.clone(),
                plain_change_capacity.saturating_add(fee),
            )
            .await?;
            info!(
                "USDI cells can not pay fee {}, add {} capacity cells of {} shannons",
                fee,
                auxiliary.cells.len(),
                auxiliary.total
            );
            let draft = self.transfer_draft(&transfer, auxiliary.cells)?;
            let draft_fee = self.estimate_fee(&draft);
            if draft_fee <= fee {
                return self.pay_fee(draft);
            }
            fee = draft_fee;
        }
    }

    fn estimate_fee(&self, draft: &TxSkeleton) -> u64 {
        calculate_fee(tx_size(draft), self.fee_rate)
    }

    /// Without auxiliary cells the token change output is the change output,
    /// with them a plain secp256k1 output is.
    fn transfer_draft(
        &self,
        transfer: &UsdiTransfer<'_>,
        auxiliary_cells: Vec<LiveCell>,
    ) -> Result<TxSkeleton> {
        let from_lockscript = transfer.from_lockscript;
        let with_auxiliary = !auxiliary_cells.is_empty();

        let mut helper = TxHelper::default();
        helper.add_inputs(transfer.selection.cells.iter().cloned());
        helper.add_inputs(auxiliary_cells);
        helper.add_input(transfer.target.clone());

        let change_usdi_output =
            self.usdi_output(from_lockscript.clone(), transfer.selection.capacity());
        let change_usdi_data = udt_data(transfer.selection.total - transfer.amount);
        if with_auxiliary {
            helper.add_output(change_usdi_output, change_usdi_data);
        } else {
            helper.add_change_output(change_usdi_output, change_usdi_data)?;
        }
        helper.add_output(
            transfer.target.output.clone(),
            udt_data(transfer.target_amount),
        );
        if with_auxiliary {
            helper.add_change_output(
                CellOutput::new_builder().lock(from_lockscript.clone()).build(),
                Bytes::new(),
            )?;
        }
        helper.add_cell_deps(vec![
            self.scripts.secp256k1_dep.clone(),
            self.scripts.acp_dep.clone(),
            self.scripts.usdi_dep.clone(),
        ]);
        helper.require_udt_balance(self.scripts.usdi_typescript.clone());
        helper.build(from_lockscript)
    }

    /// Sweeps every USDI cell under the acp lock of `lock_args` into one cell
    /// of `to_lockscript`, the fee is taken from the swept capacity.
    pub async fn transfer_all_from_acp(
        &self,
        lock_args: Bytes,
        to_lockscript: Script,
    ) -> Result<TxSkeleton> {
        let usdi_typescript = self.scripts.usdi_typescript.clone();
        let acp_lockscript = self.scripts.acp_lockscript(lock_args);
        let cells =
            collect_all_udt_cells(&self.chain, acp_lockscript.clone(), usdi_typescript.clone())
                .await?;
        if cells.is_empty() {
            return Err(TxBuildError::NoMatchingCell(format!(
                "no acp USDI cell found for lock {}",
                acp_lockscript
            )));
        }
        let usdi_amount = cells
            .iter()
            .map(|cell| cell.udt_amount_of(&usdi_typescript))
            .try_fold(0u128, |total, amount| total.checked_add(amount))
            .ok_or_else(|| TxBuildError::MalformedDraft("USDI amount overflows".to_string()))?;
        info!(
            "sweep {} acp cells, USDI amount: {}",
            cells.len(),
            usdi_amount
        );

        let mut helper = TxHelper::default();
        helper.add_inputs(cells);
        helper.add_change_output(self.usdi_output(to_lockscript, 0), udt_data(usdi_amount))?;
        helper.add_cell_deps(vec![
            self.scripts.acp_dep.clone(),
            self.scripts.usdi_dep.clone(),
        ]);
        helper.require_udt_balance(usdi_typescript);

        let skeleton = helper.build(&acp_lockscript)?;
        self.pay_fee(skeleton)
    }

    pub async fn sign_and_send_transaction<S: KeySigner + ?Sized>(
        &self,
        skeleton: TxSkeleton,
        signer: &S,
    ) -> Result<H256> {
        let tx = seal(skeleton, signer)?;
        log::debug!(
            "tx: \n{}",
            serde_json::to_string_pretty(&ckb_jsonrpc_types::TransactionView::from(tx.clone()))
                .unwrap_or_default()
        );
        let tx_hash = self.chain.broadcast(tx).await?;
        info!("tx hash is: {:#x}", tx_hash);
        Ok(tx_hash)
    }

    pub async fn get_capacities(&self, lockscript: Script) -> Result<u64> {
        collect_capacity(&self.chain, lockscript).await
    }

    pub async fn get_usdi_balance(&self, lockscript: Script) -> Result<u128> {
        collect_udt_amount(&self.chain, lockscript, self.scripts.usdi_typescript.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::scripts::Network;
    use acp_sdk::cell::{parse_udt_amount, LiveCell};
    use acp_sdk::constants::DEFAULT_FEE_RATE;
    use acp_sdk::mock::MockChain;
    use acp_sdk::signer::SecpSigner;
    use ckb_types::packed::OutPoint;

    const PRIVKEY: &str = "0xd00c06bfd800d27397002dca6fb0993d5ba6399b4238b2f29ee9deb97593d2bc";

    fn out_point(index: u32) -> OutPoint {
        OutPoint::new_builder()
            .tx_hash(H256::from([index as u8 + 1; 32]).pack())
            .index(index.pack())
            .build()
    }

    fn cell(output: CellOutput, data: Bytes, index: u32) -> LiveCell {
        LiveCell::new(output, data, out_point(index))
    }

    struct Fixture {
        scripts: NetworkScripts,
        signer: SecpSigner,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                scripts: NetworkScripts::new(Network::Testnet),
                signer: SecpSigner::from_privkey_str(Some(PRIVKEY)).unwrap(),
            }
        }

        fn secp_lock(&self) -> Script {
            self.scripts.secp256k1_lockscript(self.signer.lock_args())
        }

        fn acp_lock(&self) -> Script {
            self.scripts.acp_lockscript(self.signer.lock_args())
        }

        fn plain_cell(&self, ckb: u64, index: u32) -> LiveCell {
            self.plain_cell_shannons(ckb * ONE_CKB, index)
        }

        fn plain_cell_shannons(&self, shannons: u64, index: u32) -> LiveCell {
            let output = CellOutput::new_builder()
                .capacity(Capacity::shannons(shannons).pack())
                .lock(self.secp_lock())
                .build();
            cell(output, Bytes::new(), index)
        }

        fn usdi_cell(&self, lock: Script, capacity: u64, amount: u128, index: u32) -> LiveCell {
            let output = CellOutput::new_builder()
                .capacity(Capacity::shannons(capacity).pack())
                .lock(lock)
                .type_(Some(self.scripts.usdi_typescript.clone()).pack())
                .build();
            cell(output, udt_data(amount), index)
        }

        fn generator(&self, cells: Vec<LiveCell>) -> Generator<MockChain> {
            Generator::new(MockChain::new(cells), self.scripts.clone(), DEFAULT_FEE_RATE)
        }
    }

    fn amount(skeleton: &TxSkeleton, idx: usize) -> u128 {
        parse_udt_amount(&skeleton.outputs_data[idx]).unwrap()
    }

    fn capacity(skeleton: &TxSkeleton, idx: usize) -> u64 {
        skeleton.outputs[idx].capacity().unpack()
    }

    fn fee(skeleton: &TxSkeleton) -> u128 {
        skeleton.inputs_capacity() - skeleton.outputs_capacity()
    }

    #[tokio::test]
    async fn test_create_acp_cells() {
        let f = Fixture::new();
        let generator = f.generator(vec![f.plain_cell(100, 0), f.plain_cell(400, 1), f.plain_cell(50, 2)]);
        let skeleton = generator
            .create_acp_cells(f.signer.lock_args(), 2, ACP_DEFAULT_CAPACITY)
            .await
            .unwrap();

        assert_eq!(skeleton.inputs.len(), 2);
        assert_eq!(skeleton.outputs.len(), 3);
        for idx in 0..2 {
            assert_eq!(skeleton.outputs[idx].lock(), f.acp_lock());
            assert_eq!(capacity(&skeleton, idx), ACP_DEFAULT_CAPACITY);
            assert_eq!(amount(&skeleton, idx), 0);
        }
        assert_eq!(skeleton.change_index, 2);
        assert_eq!(skeleton.outputs[2].lock(), f.secp_lock());
        assert!(skeleton.outputs_data[2].is_empty());
        assert!(fee(&skeleton) > 0);
        assert_eq!(
            u128::from(capacity(&skeleton, 2)) + fee(&skeleton),
            u128::from(500 * ONE_CKB - 2 * ACP_DEFAULT_CAPACITY)
        );
        assert_eq!(
            skeleton.cell_deps,
            vec![f.scripts.secp256k1_dep.clone(), f.scripts.usdi_dep.clone()]
        );
    }

    #[tokio::test]
    async fn test_create_acp_cells_insufficient() {
        let f = Fixture::new();
        let generator = f.generator(vec![f.plain_cell(200, 0)]);
        let err = generator
            .create_acp_cells(f.signer.lock_args(), 1, ACP_DEFAULT_CAPACITY)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            TxBuildError::InsufficientFunds {
                required: ACP_DEFAULT_CAPACITY + MIN_SECP_CELL_CAPACITY,
                available: 200 * ONE_CKB,
            }
        );
        assert!(matches!(
            generator.create_acp_cells(f.signer.lock_args(), 0, ACP_DEFAULT_CAPACITY).await,
            Err(TxBuildError::MalformedDraft(_))
        ));
    }

    #[tokio::test]
    async fn test_transfer_to_acp_without_auxiliary_cell() {
        let f = Fixture::new();
        let recipient_lock = f.scripts.acp_lockscript(Bytes::from(vec![3u8; 20]));
        let recipient = f.usdi_cell(recipient_lock.clone(), ACP_DEFAULT_CAPACITY, 7, 9);
        let generator = f.generator(vec![
            f.usdi_cell(f.secp_lock(), 200 * ONE_CKB, 1_000_000, 0),
            f.plain_cell(1000, 1),
            f.usdi_cell(f.secp_lock(), 200 * ONE_CKB, 2_000_000, 2),
            recipient.clone(),
        ]);

        let skeleton = generator
            .transfer_to_acp(f.signer.lock_args(), recipient_lock.clone(), 1_500_000)
            .await
            .unwrap();
        // token cells, then the recipient, no capacity cell
        assert_eq!(skeleton.inputs.len(), 3);
        assert_eq!(skeleton.inputs[2], recipient);
        assert_eq!(skeleton.outputs.len(), 2);
        assert_eq!(skeleton.change_index, 0);
        assert_eq!(amount(&skeleton, 0), 1_500_000);
        assert_eq!(amount(&skeleton, 1), 1_500_007);
        assert_eq!(skeleton.outputs[1], recipient.output);
        assert_eq!(
            u128::from(capacity(&skeleton, 0)) + fee(&skeleton),
            u128::from(400 * ONE_CKB)
        );
        assert_eq!(skeleton.cell_deps.len(), 3);

        let tx_hash = generator
            .sign_and_send_transaction(skeleton, &f.signer)
            .await
            .unwrap();
        let sent = generator.chain.sent_txs();
        assert_eq!(sent.len(), 1);
        let sent_hash: H256 = sent[0].hash().unpack();
        assert_eq!(sent_hash, tx_hash);
    }

    #[tokio::test]
    async fn test_transfer_to_acp_with_auxiliary_cell() {
        let f = Fixture::new();
        let recipient_lock = f.scripts.acp_lockscript(Bytes::from(vec![3u8; 20]));
        let exact = 142 * ONE_CKB;
        let generator = f.generator(vec![
            f.usdi_cell(f.secp_lock(), exact, 1_000_000, 0),
            f.plain_cell(100, 1),
            f.usdi_cell(recipient_lock.clone(), ACP_DEFAULT_CAPACITY, 0, 9),
        ]);

        let skeleton = generator
            .transfer_to_acp(f.signer.lock_args(), recipient_lock, 400_000)
            .await
            .unwrap();
        assert_eq!(skeleton.inputs.len(), 3);
        assert_eq!(skeleton.outputs.len(), 3);
        assert_eq!(skeleton.change_index, 2);
        assert_eq!(capacity(&skeleton, 0), exact);
        assert_eq!(amount(&skeleton, 0), 600_000);
        assert_eq!(amount(&skeleton, 1), 400_000);
        assert_eq!(
            u128::from(capacity(&skeleton, 2)) + fee(&skeleton),
            u128::from(100 * ONE_CKB)
        );
    }

    #[tokio::test]
    async fn test_transfer_to_acp_surplus_below_fee() {
        let f = Fixture::new();
        let recipient_lock = f.scripts.acp_lockscript(Bytes::from(vec![3u8; 20]));
        let token_capacity = 142 * ONE_CKB + 1;
        let generator = f.generator(vec![
            f.usdi_cell(f.secp_lock(), token_capacity, 100, 0),
            f.plain_cell(1000, 1),
            f.usdi_cell(recipient_lock.clone(), ACP_DEFAULT_CAPACITY, 0, 9),
        ]);

        let skeleton = generator
            .transfer_to_acp(f.signer.lock_args(), recipient_lock, 10)
            .await
            .unwrap();
        assert_eq!(skeleton.inputs.len(), 3);
        assert_eq!(skeleton.change_index, 2);
        assert_eq!(capacity(&skeleton, 0), token_capacity);
        assert_eq!(amount(&skeleton, 0), 90);
        assert_eq!(amount(&skeleton, 1), 10);
        assert_eq!(
            u128::from(capacity(&skeleton, 2)) + fee(&skeleton),
            u128::from(1000 * ONE_CKB)
        );
    }

    #[tokio::test]
    async fn test_transfer_to_acp_auxiliary_covers_fee() {
        let f = Fixture::new();
        let recipient_lock = f.scripts.acp_lockscript(Bytes::from(vec![3u8; 20]));
        // the first capacity cell holds a secp256k1 change cell but not the fee
        let generator = f.generator(vec![
            f.usdi_cell(f.secp_lock(), 142 * ONE_CKB, 100, 0),
            f.plain_cell_shannons(MIN_SECP_CELL_CAPACITY + 100, 1),
            f.plain_cell(100, 2),
            f.usdi_cell(recipient_lock.clone(), ACP_DEFAULT_CAPACITY, 0, 9),
        ]);

        let skeleton = generator
            .transfer_to_acp(f.signer.lock_args(), recipient_lock, 10)
            .await
            .unwrap();
        assert_eq!(skeleton.inputs.len(), 4);
        assert_eq!(skeleton.outputs.len(), 3);
        assert_eq!(skeleton.change_index, 2);
        assert_eq!(skeleton.outputs[2].lock(), f.secp_lock());
        assert_eq!(
            u128::from(capacity(&skeleton, 2)) + fee(&skeleton),
            u128::from(MIN_SECP_CELL_CAPACITY + 100 + 100 * ONE_CKB)
        );
        assert_eq!(
            fee(&skeleton),
            u128::from(calculate_fee(tx_size(&skeleton), DEFAULT_FEE_RATE))
        );
    }

    #[tokio::test]
    async fn test_transfer_to_acp_failures() {
        let f = Fixture::new();
        let recipient_lock = f.scripts.acp_lockscript(Bytes::from(vec![3u8; 20]));

        let generator = f.generator(vec![f.usdi_cell(f.secp_lock(), 200 * ONE_CKB, 10, 0)]);
        assert!(matches!(
            generator
                .transfer_to_acp(f.signer.lock_args(), recipient_lock.clone(), 5)
                .await,
            Err(TxBuildError::NoMatchingCell(_))
        ));

        let generator = f.generator(vec![
            f.usdi_cell(f.secp_lock(), 200 * ONE_CKB, 10, 0),
            f.usdi_cell(recipient_lock.clone(), ACP_DEFAULT_CAPACITY, 0, 9),
        ]);
        assert_eq!(
            generator
                .transfer_to_acp(f.signer.lock_args(), recipient_lock.clone(), 10)
                .await
                .unwrap_err(),
            TxBuildError::InsufficientToken {
                required: 10,
                available: 10
            }
        );

        // no surplus and no capacity cell to pay the fee
        let generator = f.generator(vec![
            f.usdi_cell(f.secp_lock(), 142 * ONE_CKB, 10, 0),
            f.usdi_cell(recipient_lock.clone(), ACP_DEFAULT_CAPACITY, 0, 9),
        ]);
        assert!(matches!(
            generator
                .transfer_to_acp(f.signer.lock_args(), recipient_lock, 5)
                .await,
            Err(TxBuildError::InsufficientFunds { .. })
        ));
    }

    #[tokio::test]
    async fn test_transfer_all_from_acp() {
        let f = Fixture::new();
        let to_lock = f.scripts.secp256k1_lockscript(Bytes::from(vec![5u8; 20]));
        let generator = f.generator(vec![
            f.usdi_cell(f.acp_lock(), ACP_DEFAULT_CAPACITY, 3, 0),
            f.plain_cell(100, 1),
            f.usdi_cell(f.acp_lock(), ACP_DEFAULT_CAPACITY, 4, 2),
        ]);
        let skeleton = generator
            .transfer_all_from_acp(f.signer.lock_args(), to_lock.clone())
            .await
            .unwrap();
        assert_eq!(skeleton.inputs.len(), 2);
        assert_eq!(skeleton.outputs.len(), 1);
        assert_eq!(skeleton.outputs[0].lock(), to_lock);
        assert_eq!(amount(&skeleton, 0), 7);
        assert_eq!(
            u128::from(capacity(&skeleton, 0)) + fee(&skeleton),
            u128::from(2 * ACP_DEFAULT_CAPACITY)
        );
        assert_eq!(
            skeleton.cell_deps,
            vec![f.scripts.acp_dep.clone(), f.scripts.usdi_dep.clone()]
        );

        let empty = f.generator(vec![f.plain_cell(100, 1)]);
        assert!(matches!(
            empty
                .transfer_all_from_acp(f.signer.lock_args(), to_lock)
                .await,
            Err(TxBuildError::NoMatchingCell(_))
        ));
    }

    #[tokio::test]
    async fn test_balances() {
        let f = Fixture::new();
        let generator = f.generator(vec![
            f.usdi_cell(f.secp_lock(), 200 * ONE_CKB, 10, 0),
            f.plain_cell(100, 1),
            f.usdi_cell(f.secp_lock(), 200 * ONE_CKB, 32, 2),
            f.usdi_cell(f.acp_lock(), ACP_DEFAULT_CAPACITY, 1000, 3),
        ]);
        assert_eq!(
            generator.get_capacities(f.secp_lock()).await.unwrap(),
            500 * ONE_CKB
        );
        assert_eq!(generator.get_usdi_balance(f.secp_lock()).await.unwrap(), 42);
        assert_eq!(generator.get_usdi_balance(f.acp_lock()).await.unwrap(), 1000);
    }
}
