//! Parses a hex-encoded script and prints its chunks and classification.
//!
//! ```text
//! cargo run --example inspect -- 76a91489abcdefabbaabbaabbaabbaabbaabbaabbaabba88ac
//! ```

use bitcoin_script_engine::script::Script;

fn main() {
    let hex_arg = match std::env::args().nth(1) {
        Some(arg) => arg,
        None => {
            eprintln!("usage: inspect <hex-script>");
            std::process::exit(2);
        }
    };

    let script = match Script::parse_hex(&hex_arg) {
        Ok(script) => script,
        Err(err) => {
            eprintln!("failed to parse: {err}");
            std::process::exit(1);
        }
    };

    println!("{script}");
    println!("bytes:          {}", script.len());
    println!("chunks:         {}", script.chunks().len());
    println!("push-only:      {}", script.is_push_only());
    println!("p2pk:           {}", script.is_pay_to_pubkey());
    println!("p2pkh:          {}", script.is_pay_to_pubkey_hash());
    println!("p2sh:           {}", script.is_pay_to_script_hash());
    println!("multisig:       {}", script.is_multisig());
    println!("sig ops:        {}", script.sig_op_count(true));
    if let Some(hash) = script.pubkey_hash() {
        println!("pubkey hash:    {}", hex::encode(hash));
    }
}
