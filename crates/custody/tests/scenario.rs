use std::sync::Arc;
use std::thread;

use custody::{
    kdf, record, shares, CipherError, CustodyError, CustodyManager, FieldValue, MasterSecret,
    Record, RecordError, ShareError,
};
use serde_json::json;

fn tomoko_asset() -> Record {
    Record::from_json_object(json!({
        "Color": "blue",
        "Size": 5,
        "Owner": "Tomoko",
        "AppraisedValue": 300,
    }))
    .unwrap()
}

#[test]
fn split_ten_threshold_two_encrypt_and_decrypt_asset() {
    let secret = MasterSecret::generate(32);
    let set = shares::split(secret.expose(), 10, 2).unwrap();

    // Positions 2 and 3 of the generated set.
    let recovered = shares::combine(&set.as_slice()[2..4], 2).unwrap();
    assert_eq!(recovered, secret);

    let key = kdf::derive(&recovered, "asset1");
    let asset = tomoko_asset();
    let sealed = record::encrypt_record(&key, &asset).unwrap();
    let opened = record::decrypt_record(&key, &sealed).unwrap();

    assert_eq!(opened, asset);
    assert_eq!(opened.get("Size"), Some(&FieldValue::Integer(5)));
    assert_eq!(opened.get("AppraisedValue"), Some(&FieldValue::Integer(300)));
    assert_eq!(opened.get("Owner"), Some(&FieldValue::Text("Tomoko".into())));
}

#[test]
fn single_share_of_threshold_two_fails() {
    let set = shares::split(&[7u8; 32], 10, 2).unwrap();
    let err = shares::combine(&set.as_slice()[2..3], 2).unwrap_err();
    assert!(matches!(err, ShareError::InsufficientShares { required: 2, supplied: 1 }));
}

#[test]
fn manager_with_externally_chosen_subset() {
    let manager = CustodyManager::provision(MasterSecret::generate(32), 10, 2).unwrap();
    let subset = manager.shares_at(&[3, 4]).unwrap();
    let secret = manager.reconstruct_key(&subset).unwrap();
    let key = kdf::derive(&secret, "asset1");

    let sealed = record::encrypt_record(&key, &tomoko_asset()).unwrap();
    // Any other quorum reconstructs the same key.
    let other = manager.reconstruct_key(&manager.shares_at(&[10, 1]).unwrap()).unwrap();
    let opened = record::decrypt_record(&kdf::derive(&other, "asset1"), &sealed).unwrap();
    assert_eq!(opened, tomoko_asset());
}

#[test]
fn key_for_another_record_cannot_decrypt() {
    let manager = CustodyManager::provision(MasterSecret::generate(32), 5, 3).unwrap();
    let secret = manager.reconstruct_key(&manager.shares_at(&[1, 2, 3]).unwrap()).unwrap();
    let sealed = record::encrypt_record(&kdf::derive(&secret, "asset1"), &tomoko_asset()).unwrap();

    let err = record::decrypt_record(&kdf::derive(&secret, "asset2"), &sealed).unwrap_err();
    assert!(matches!(
        err,
        RecordError::FieldDecryptionFailure { source: CipherError::MalformedCiphertext(_), .. }
    ));
}

#[test]
fn one_share_short_through_manager() {
    let manager = CustodyManager::provision(MasterSecret::generate(32), 5, 3).unwrap();
    let err = manager.reconstruct_key(&manager.shares_at(&[1, 5]).unwrap()).unwrap_err();
    assert!(matches!(
        err,
        CustodyError::Share(ShareError::InsufficientShares { required: 3, supplied: 2 })
    ));
}

#[test]
fn independent_managers_do_not_share_state() {
    let a = CustodyManager::provision(MasterSecret::generate(32), 4, 2).unwrap();
    let b = CustodyManager::provision(MasterSecret::generate(32), 4, 2).unwrap();
    let sa = a.reconstruct_key(&a.shares_at(&[1, 2]).unwrap()).unwrap();
    let sb = b.reconstruct_key(&b.shares_at(&[1, 2]).unwrap()).unwrap();
    assert_ne!(sa, sb);
}

#[test]
fn concurrent_callers_agree() {
    let manager = Arc::new(CustodyManager::provision(MasterSecret::generate(32), 10, 2).unwrap());
    let asset = tomoko_asset();

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let manager = Arc::clone(&manager);
                let asset = &asset;
                scope.spawn(move || {
                    let subset = manager.shares_at(&[i + 1, i + 2]).unwrap();
                    let secret = manager.reconstruct_key(&subset).unwrap();
                    let key = kdf::derive(&secret, "asset1");
                    record::encrypt_record(&key, asset).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(results.windows(2).all(|w| w[0] == w[1]));
}
