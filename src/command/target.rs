use anyhow::Result;

use crate::cli::TargetAction;
use crate::config::{Target, TargetStore};

pub async fn run_target(action: TargetAction, config_dir: Option<String>) -> Result<()> {
    let store = TargetStore::new(config_dir)?;

    match action {
        TargetAction::Set {
            api_url,
            token,
            space,
        } => {
            let target = Target {
                api_url,
                access_token: token,
                space,
            };
            store.save_target(&target)?;
            println!("✅ Target set to {}", target.api_url);
        }
        TargetAction::Show => match store.get_target()? {
            Some(target) => {
                println!("API URL: {}", target.api_url);
                if let Some(space) = target.space {
                    println!("Space:   {}", space);
                }
            }
            None => {
                println!("❌ No target configured");
                println!("   Run 'appbits target set --api-url <URL> --token <TOKEN>'.");
            }
        },
        TargetAction::Clear => {
            store.remove_target()?;
            println!("✅ Target cleared");
        }
    }

    Ok(())
}
