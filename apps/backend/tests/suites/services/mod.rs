mod diagnostics;
mod repairs;
