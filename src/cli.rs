// Copyright 2025 The NoteQ Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Start the NoteQ web interface.
    Serve {
        /// Port to listen on.
        #[arg(long)]
        port: Option<u16>,
        /// Origin of the quiz backend, e.g. `http://127.0.0.1:8000`.
        #[arg(long)]
        backend: Option<String>,
        /// Path to a `noteq.toml` configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Don't open the browser after the server starts.
        #[arg(long)]
        no_browser: bool,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Serve {
            port,
            backend,
            config,
            no_browser,
        } => {
            let config = Config::resolve(port, backend, config)?;
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(crate::serve::server::start_server(config, !no_browser))
        }
    }
}
