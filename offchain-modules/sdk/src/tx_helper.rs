use crate::capacity::minimal_cell_capacity;
use crate::cell::LiveCell;
use crate::constants::SECP_SIGNATURE_SIZE;
use crate::error::{Result, TxBuildError};
use ckb_types::{
    bytes::Bytes,
    core::{Capacity, TransactionBuilder, TransactionView},
    packed::{CellDep, CellInput, CellOutput, Script, WitnessArgs},
    prelude::*,
};
use std::convert::TryFrom;

/// `WitnessArgs` whose lock is a zero-filled signature, the same size as the
/// signature that replaces it.
pub fn placeholder_witness() -> WitnessArgs {
    WitnessArgs::new_builder()
        .lock(Some(Bytes::from(vec![0u8; SECP_SIGNATURE_SIZE])).pack())
        .build()
}

/// A transaction draft. Inputs locked by `signer_lock` come first and the
/// witness at index 0 belongs to their lock group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxSkeleton {
    pub inputs: Vec<LiveCell>,
    pub outputs: Vec<CellOutput>,
    pub outputs_data: Vec<Bytes>,
    pub cell_deps: Vec<CellDep>,
    pub witnesses: Vec<Bytes>,
    pub change_index: usize,
    pub signer_lock: Script,
}

impl TxSkeleton {
    /// input indexes of the signer's lock group
    pub fn signer_group(&self) -> Vec<usize> {
        self.inputs
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.lock() == self.signer_lock)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn inputs_capacity(&self) -> u128 {
        self.inputs.iter().map(|cell| u128::from(cell.capacity())).sum()
    }

    pub fn outputs_capacity(&self) -> u128 {
        self.outputs
            .iter()
            .map(|output| u128::from(Unpack::<u64>::unpack(&output.capacity())))
            .sum()
    }

    pub fn change_output(&self) -> &CellOutput {
        &self.outputs[self.change_index]
    }

    pub fn change_capacity(&self) -> u64 {
        self.change_output().capacity().unpack()
    }

    /// (inputs amount, outputs amount) of `udt_typescript`
    pub fn udt_balance(&self, udt_typescript: &Script) -> (u128, u128) {
        let inputs = self
            .inputs
            .iter()
            .map(|cell| cell.udt_amount_of(udt_typescript))
            .fold(0u128, u128::saturating_add);
        let outputs = self
            .outputs
            .iter()
            .zip(self.outputs_data.iter())
            .map(|(output, data)| {
                LiveCell::new(output.clone(), data.clone(), Default::default())
                    .udt_amount_of(udt_typescript)
            })
            .fold(0u128, u128::saturating_add);
        (inputs, outputs)
    }

    /// Same draft with the change output holding `capacity`.
    pub fn with_change_capacity(mut self, capacity: u64) -> Self {
        let change = self.outputs[self.change_index]
            .clone()
            .as_builder()
            .capacity(Capacity::shannons(capacity).pack())
            .build();
        self.outputs[self.change_index] = change;
        self
    }

    pub fn with_witness(mut self, index: usize, witness: Bytes) -> Self {
        if index >= self.witnesses.len() {
            self.witnesses.resize(index + 1, Bytes::new());
        }
        self.witnesses[index] = witness;
        self
    }

    pub fn to_transaction_view(&self) -> TransactionView {
        TransactionBuilder::default()
            .inputs(
                self.inputs
                    .iter()
                    .map(|cell| CellInput::new(cell.out_point.clone(), 0)),
            )
            .outputs(self.outputs.clone())
            .outputs_data(self.outputs_data.iter().map(|data| data.pack()))
            .cell_deps(self.cell_deps.clone())
            .witnesses(self.witnesses.iter().map(|witness| witness.pack()))
            .build()
    }
}

/// Collects the parts of a transaction, then `build` checks them and lays
/// them out into a [`TxSkeleton`].
#[derive(Clone, Debug, Default)]
pub struct TxHelper {
    inputs: Vec<LiveCell>,
    outputs: Vec<(CellOutput, Bytes)>,
    cell_deps: Vec<CellDep>,
    change_index: Option<usize>,
    balanced_udts: Vec<Script>,
}

impl TxHelper {
    pub fn add_input(&mut self, cell: LiveCell) {
        self.inputs.push(cell);
    }

    pub fn add_inputs<I: IntoIterator<Item = LiveCell>>(&mut self, cells: I) {
        self.inputs.extend(cells);
    }

    pub fn add_output(&mut self, output: CellOutput, data: Bytes) {
        self.outputs.push((output, data));
    }

    pub fn add_output_with_auto_capacity(&mut self, output: CellOutput, data: Bytes) -> Result<()> {
        let capacity = minimal_cell_capacity(&output, data.len())?;
        let output = output
            .as_builder()
            .capacity(Capacity::shannons(capacity).pack())
            .build();
        self.add_output(output, data);
        Ok(())
    }

    /// The change output takes whatever capacity the other outputs leave,
    /// its capacity field is overwritten by `build`.
    pub fn add_change_output(&mut self, output: CellOutput, data: Bytes) -> Result<()> {
        if self.change_index.is_some() {
            return Err(TxBuildError::MalformedDraft(
                "change output is already set".to_string(),
            ));
        }
        self.change_index = Some(self.outputs.len());
        self.add_output(output, data);
        Ok(())
    }

    pub fn add_cell_dep(&mut self, cell_dep: CellDep) {
        if !self.cell_deps.contains(&cell_dep) {
            self.cell_deps.push(cell_dep);
        }
    }

    pub fn add_cell_deps<I: IntoIterator<Item = CellDep>>(&mut self, cell_deps: I) {
        for cell_dep in cell_deps {
            self.add_cell_dep(cell_dep);
        }
    }

    /// `build` fails unless inputs and outputs carry the same amount of
    /// this udt.
    pub fn require_udt_balance(&mut self, udt_typescript: Script) {
        self.balanced_udts.push(udt_typescript);
    }

    pub fn build(self, signer_lock: &Script) -> Result<TxSkeleton> {
        if self.inputs.is_empty() {
            return Err(TxBuildError::MalformedDraft("no inputs".to_string()));
        }
        let change_index = self.change_index.ok_or_else(|| {
            TxBuildError::MalformedDraft("no change output".to_string())
        })?;

        let inputs_capacity: u128 = self
            .inputs
            .iter()
            .map(|cell| u128::from(cell.capacity()))
            .sum();
        let mut fixed_capacity = 0u128;
        for (idx, (output, data)) in self.outputs.iter().enumerate() {
            if idx == change_index {
                continue;
            }
            let capacity: u64 = output.capacity().unpack();
            let minimal = minimal_cell_capacity(output, data.len())?;
            if capacity < minimal {
                return Err(TxBuildError::MalformedDraft(format!(
                    "output {} holds {} shannons, less than its occupied capacity {}",
                    idx, capacity, minimal
                )));
            }
            fixed_capacity += u128::from(capacity);
        }
        let change_capacity = inputs_capacity
            .checked_sub(fixed_capacity)
            .and_then(|change| u64::try_from(change).ok())
            .ok_or_else(|| {
                TxBuildError::MalformedDraft(format!(
                    "inputs capacity {} can not cover outputs capacity {}",
                    inputs_capacity, fixed_capacity
                ))
            })?;

        let (signer_inputs, other_inputs): (Vec<_>, Vec<_>) = self
            .inputs
            .into_iter()
            .partition(|cell| &cell.lock() == signer_lock);
        if signer_inputs.is_empty() {
            return Err(TxBuildError::MalformedDraft(format!(
                "no input is locked by the signer lock {}",
                signer_lock
            )));
        }
        let inputs: Vec<LiveCell> = signer_inputs.into_iter().chain(other_inputs).collect();

        let mut witnesses = vec![Bytes::new(); inputs.len()];
        witnesses[0] = placeholder_witness().as_bytes();

        let (outputs, outputs_data): (Vec<_>, Vec<_>) = self.outputs.into_iter().unzip();
        let skeleton = TxSkeleton {
            inputs,
            outputs,
            outputs_data,
            cell_deps: self.cell_deps,
            witnesses,
            change_index,
            signer_lock: signer_lock.clone(),
        }
        .with_change_capacity(change_capacity);

        for udt_typescript in &self.balanced_udts {
            let (inputs_amount, outputs_amount) = skeleton.udt_balance(udt_typescript);
            if inputs_amount != outputs_amount {
                return Err(TxBuildError::MalformedDraft(format!(
                    "udt amount not balanced, inputs: {}, outputs: {}",
                    inputs_amount, outputs_amount
                )));
            }
        }
        Ok(skeleton)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::udt_data;
    use crate::constants::ONE_CKB;
    use ckb_types::{core::DepType, packed::OutPoint, H256};

    fn lock(arg: u8) -> Script {
        Script::new_builder()
            .args(Bytes::from(vec![arg; 20]).pack())
            .build()
    }

    fn out_point(index: u32) -> OutPoint {
        OutPoint::new_builder()
            .tx_hash(H256::from([index as u8 + 1; 32]).pack())
            .index(index.pack())
            .build()
    }

    fn input(lock: Script, ckb: u64, index: u32) -> LiveCell {
        let output = CellOutput::new_builder()
            .capacity(Capacity::shannons(ckb * ONE_CKB).pack())
            .lock(lock)
            .build();
        LiveCell::new(output, Bytes::new(), out_point(index))
    }

    fn output(lock: Script, ckb: u64) -> CellOutput {
        CellOutput::new_builder()
            .capacity(Capacity::shannons(ckb * ONE_CKB).pack())
            .lock(lock)
            .build()
    }

    #[test]
    fn test_build_derives_change_and_orders_signer_first() {
        let signer = lock(1);
        let mut helper = TxHelper::default();
        helper.add_input(input(lock(2), 100, 0));
        helper.add_input(input(signer.clone(), 200, 1));
        helper.add_input(input(signer.clone(), 300, 2));
        helper.add_output(output(lock(3), 150), Bytes::new());
        helper.add_change_output(output(signer.clone(), 0), Bytes::new()).unwrap();

        let skeleton = helper.build(&signer).unwrap();
        assert_eq!(skeleton.signer_group(), vec![0, 1]);
        assert_eq!(skeleton.inputs[2].lock(), lock(2));
        assert_eq!(skeleton.change_index, 1);
        assert_eq!(skeleton.change_capacity(), 450 * ONE_CKB);
        assert_eq!(skeleton.inputs_capacity(), skeleton.outputs_capacity());

        assert_eq!(skeleton.witnesses.len(), 3);
        assert_eq!(skeleton.witnesses[0], placeholder_witness().as_bytes());
        assert!(skeleton.witnesses[1].is_empty());
        let witness = WitnessArgs::from_slice(&skeleton.witnesses[0]).unwrap();
        assert_eq!(
            witness.lock().to_opt().unwrap().raw_data().len(),
            SECP_SIGNATURE_SIZE
        );
    }

    #[test]
    fn test_build_without_inputs() {
        let mut helper = TxHelper::default();
        helper.add_change_output(output(lock(1), 0), Bytes::new()).unwrap();
        assert!(matches!(
            helper.build(&lock(1)),
            Err(TxBuildError::MalformedDraft(_))
        ));
    }

    #[test]
    fn test_build_with_negative_change() {
        let mut helper = TxHelper::default();
        helper.add_input(input(lock(1), 100, 0));
        helper.add_output(output(lock(3), 101), Bytes::new());
        helper.add_change_output(output(lock(1), 0), Bytes::new()).unwrap();
        assert!(matches!(
            helper.build(&lock(1)),
            Err(TxBuildError::MalformedDraft(_))
        ));
    }

    #[test]
    fn test_build_without_signer_input() {
        let mut helper = TxHelper::default();
        helper.add_input(input(lock(2), 100, 0));
        helper.add_change_output(output(lock(1), 0), Bytes::new()).unwrap();
        assert!(matches!(
            helper.build(&lock(1)),
            Err(TxBuildError::MalformedDraft(_))
        ));
    }

    #[test]
    fn test_build_rejects_under_funded_output() {
        let mut helper = TxHelper::default();
        helper.add_input(input(lock(1), 1000, 0));
        helper.add_output(output(lock(3), 60), Bytes::new());
        helper.add_change_output(output(lock(1), 0), Bytes::new()).unwrap();
        assert!(matches!(
            helper.build(&lock(1)),
            Err(TxBuildError::MalformedDraft(_))
        ));
    }

    #[test]
    fn test_single_change_output() {
        let mut helper = TxHelper::default();
        helper.add_change_output(output(lock(1), 0), Bytes::new()).unwrap();
        assert!(helper.add_change_output(output(lock(1), 0), Bytes::new()).is_err());
    }

    #[test]
    fn test_auto_capacity_and_cell_deps() {
        let mut helper = TxHelper::default();
        helper.add_input(input(lock(1), 1000, 0));
        helper
            .add_output_with_auto_capacity(output(lock(3), 0), Bytes::from(vec![0u8; 10]))
            .unwrap();
        helper.add_change_output(output(lock(1), 0), Bytes::new()).unwrap();
        let dep = CellDep::new_builder()
            .out_point(out_point(7))
            .dep_type(DepType::DepGroup.into())
            .build();
        helper.add_cell_deps(vec![dep.clone(), dep.clone()]);

        let skeleton = helper.build(&lock(1)).unwrap();
        let auto: u64 = skeleton.outputs[0].capacity().unpack();
        assert_eq!(auto, 71 * ONE_CKB);
        assert_eq!(skeleton.change_capacity(), 929 * ONE_CKB);
        assert_eq!(skeleton.cell_deps, vec![dep]);
    }

    #[test]
    fn test_udt_balance_is_enforced() {
        let udt = lock(9);
        let token_input = {
            let output = CellOutput::new_builder()
                .capacity(Capacity::shannons(200 * ONE_CKB).pack())
                .lock(lock(1))
                .type_(Some(udt.clone()).pack())
                .build();
            LiveCell::new(output, udt_data(100), out_point(0))
        };
        let token_output = |amount: u128| {
            (
                CellOutput::new_builder()
                    .lock(lock(1))
                    .type_(Some(udt.clone()).pack())
                    .build(),
                udt_data(amount),
            )
        };

        let mut helper = TxHelper::default();
        helper.add_input(token_input.clone());
        let (output, data) = token_output(99);
        helper.add_change_output(output, data).unwrap();
        helper.require_udt_balance(udt.clone());
        assert!(matches!(
            helper.build(&lock(1)),
            Err(TxBuildError::MalformedDraft(_))
        ));

        let mut helper = TxHelper::default();
        helper.add_input(token_input);
        let (output, data) = token_output(100);
        helper.add_change_output(output, data).unwrap();
        helper.require_udt_balance(udt.clone());
        let skeleton = helper.build(&lock(1)).unwrap();
        assert_eq!(skeleton.udt_balance(&udt), (100, 100));
    }

    #[test]
    fn test_to_transaction_view() {
        let mut helper = TxHelper::default();
        helper.add_input(input(lock(1), 100, 3));
        helper.add_change_output(output(lock(1), 0), Bytes::new()).unwrap();
        let skeleton = helper.build(&lock(1)).unwrap();
        let tx = skeleton.to_transaction_view();
        assert_eq!(tx.inputs().len(), 1);
        assert_eq!(tx.inputs().get(0).unwrap().previous_output(), out_point(3));
        assert_eq!(tx.outputs().len(), 1);
        assert_eq!(tx.outputs_data().len(), 1);
        assert_eq!(tx.witnesses().len(), 1);
    }
}
