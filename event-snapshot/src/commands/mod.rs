use clap::Subcommand;

pub mod snapshot;
pub mod verify;

#[derive(Debug, Subcommand)]
pub enum SubCommand {
    /// Fetch the logs of a contract over a block range and print their snapshot and commitment
    Snapshot(snapshot::Args),
    /// Recompute the commitment of a published snapshot and check it against the recorded one
    Verify(verify::Args),
}
