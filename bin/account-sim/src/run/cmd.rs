use std::{collections::BTreeMap, path::PathBuf};

use clap::Parser;
use smart_account::{
    sim::{InMemoryHost, Token, World},
    BalanceAuthority, NonceLedger, SmartAccount,
};
use tracing::{debug, info, warn};

use super::{AccountReport, ContractType, RunReport, Scenario, StepOutcome, StepReport};
use crate::common::{emit_json, load_json, Result, SimError};

/// Run a scenario file
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Scenario JSON file. If '-' is specified, the scenario is read from stdin
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,

    /// Output file for the report (if not specified, prints to console)
    #[arg(long = "output", short = 'o')]
    pub output: Option<PathBuf>,

    /// Include every call the host performed in the report
    #[arg(long = "trace")]
    pub trace: bool,

    /// Exit with an error if any step failed
    #[arg(long = "strict")]
    pub strict: bool,
}

impl Cmd {
    /// Execute the run command
    pub fn run(&self) -> Result<()> {
        let scenario: Scenario = load_json(&self.scenario)?;
        let report = execute(&scenario, self.trace)?;
        emit_json(&report, self.output.as_deref())?;

        if self.strict {
            if let Some(failed) = report.steps.iter().find_map(|step| match &step.outcome {
                StepOutcome::Failed { error } => Some((step.index, error.clone())),
                StepOutcome::Ok { .. } => None,
            }) {
                return Err(SimError::StepFailed { index: failed.0, reason: failed.1 });
            }
        }
        Ok(())
    }
}

/// Sets up the scenario's world and runs its steps in order.
pub fn execute(scenario: &Scenario, with_trace: bool) -> Result<RunReport> {
    let mut host = InMemoryHost::with_system_contracts();
    for contract in &scenario.contracts {
        match contract.contract {
            ContractType::Token => host.insert_contract(contract.address, Token::default()),
        }
    }
    for balance in &scenario.balances {
        host.set_account_balance(balance.address, balance.amount);
    }

    let mut world = World::new(host);
    for spec in &scenario.accounts {
        let address = world.deploy_account(spec.kind, spec.config.clone())?;
        world.host_mut().set_account_balance(address, spec.balance);
        world.host_mut().set_account_nonce(address, spec.nonce);
    }
    debug!(target: "account_sim", accounts = scenario.accounts.len(), steps = scenario.steps.len(), "scenario loaded");

    let mut steps = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        let kind = world
            .account(step.account)
            .map(SmartAccount::kind)
            .ok_or(SimError::UnknownAccount { index, account: step.account })?;
        let request = step.request(kind);
        let entry_point = request.entry_point();

        let outcome = match world.submit(step.caller, step.account, request) {
            Ok(response) => StepOutcome::Ok { response },
            Err(err) => {
                warn!(target: "account_sim", index, entry_point, %err, "step failed");
                StepOutcome::Failed { error: err.to_string() }
            }
        };
        steps.push(StepReport {
            index,
            caller: step.caller,
            account: step.account,
            entry_point,
            outcome,
        });
    }

    let host = world.host();
    let accounts = scenario
        .accounts
        .iter()
        .map(|spec| AccountReport {
            address: spec.config.address,
            kind: spec.kind,
            nonce: host.current_nonce(spec.config.address),
            balance: host.balance(spec.config.address),
        })
        .collect::<Vec<_>>();

    let mut balances = BTreeMap::new();
    let others = scenario
        .balances
        .iter()
        .map(|balance| balance.address)
        .chain(scenario.contracts.iter().map(|contract| contract.address))
        .chain(scenario.accounts.iter().map(|spec| spec.config.dispatcher));
    for address in others {
        if accounts.iter().all(|account| account.address != address) {
            balances.insert(address, host.balance(address));
        }
    }

    info!(target: "account_sim", steps = steps.len(), "scenario finished");
    Ok(RunReport {
        steps,
        accounts,
        balances,
        trace: with_trace.then(|| host.trace().to_vec()),
    })
}
