//! CodeContextAnalyzer tests: language table, extraction, confidence weights.

use gateshift_analysis::context::{CodeContextAnalyzer, Language};
use gateshift_analysis::patterns::{PatternMatcher, PatternRegistry};

fn analyzer() -> CodeContextAnalyzer {
    CodeContextAnalyzer::new(PatternMatcher::new(PatternRegistry::builtin().unwrap()))
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn query_string_credentials() {
    let ctx = analyzer().analyze("legacy.txt", "ssl_amount=10.00&ssl_card_number=4111111111111111");
    assert!(ctx.credential_fields.contains(&"ssl_amount".to_string()));
    assert!(ctx.credential_fields.contains(&"ssl_card_number".to_string()));
    assert!(ctx.confidence >= 0.4);
    assert_eq!(ctx.language, Language::Unknown);
}

#[test]
fn language_is_never_absent() {
    let a = analyzer();
    for (path, expected) in [
        ("web/pay.jsx", Language::JavaScript),
        ("svc/Gateway.cs", Language::CSharp),
        ("lib/charge.rb", Language::Ruby),
        ("pos/terminal.h", Language::CFamily),
        ("Makefile", Language::Unknown),
    ] {
        assert_eq!(a.analyze(path, "").language, expected, "{path}");
    }
}

#[test]
fn javascript_checkout_module() {
    let src = r#"import axios from 'axios';
import { render } from './view';

class CheckoutForm {
  async submitPayment(order) {
    const body = {
      ssl_merchant_id: process.env.MERCHANT_ID,
      ssl_user_id: process.env.USER_ID,
      ssl_pin: process.env.PIN,
      ssl_amount: order.total,
      ssl_invoice_number: order.id,
      ssl_transaction_type: 'ccsale',
    };
    return axios.post('https://api.convergepay.com/VirtualMerchant/processxml.do', body);
  }
}
"#;
    let ctx = analyzer().analyze("src/checkout.js", src);

    assert_eq!(ctx.language, Language::JavaScript);
    assert_eq!(ctx.imports, vec!["axios", "./view"]);
    assert_eq!(ctx.classes, vec!["CheckoutForm"]);
    assert!(ctx.functions.contains(&"submitPayment".to_string()));
    assert_eq!(ctx.credential_fields.len(), 6);
    assert!(ctx.hardcoded_credentials.is_empty());
    assert!(ctx.dependencies.contains(&"axios".to_string()));
    assert_eq!(
        ctx.business_logic_keywords,
        vec!["transaction", "payment", "order", "invoice"]
    );

    // 0.4 + 0.2 (six fields) + 0.2 + 0.1 (four keywords) + 0.2 (axios import), capped
    assert!(approx(ctx.confidence, 1.0), "{}", ctx.confidence);
}

#[test]
fn python_without_library_import() {
    let src = "import os\n\ndef refund(txn):\n    data = {'ssl_txn_id': txn, 'ssl_amount': 5}\n";
    let ctx = analyzer().analyze("refund.py", src);
    assert_eq!(ctx.imports, vec!["os"]);
    assert_eq!(ctx.functions, vec!["refund"]);
    // 0.4 (fields) + 0.2 (refund keyword)
    assert!(approx(ctx.confidence, 0.6), "{}", ctx.confidence);
}

#[test]
fn many_business_keywords_add_bonus() {
    let src = "customer order invoice refund capture";
    let ctx = analyzer().analyze("notes.md", src);
    assert_eq!(ctx.business_logic_keywords.len(), 5);
    assert!(approx(ctx.confidence, 0.3));
}

#[test]
fn dependency_mentions_do_not_need_imports() {
    let ctx = analyzer().analyze("pay.php", "<?php $ch = curl_init($url);");
    assert!(ctx.dependencies.contains(&"curl".to_string()));
    assert!(ctx.imports.is_empty());
    assert!(approx(ctx.confidence, 0.0));
}

#[test]
fn enclosing_scope_of_a_detection() {
    let src = "<?php\nclass Billing {\n  function charge() {\n    $p['ssl_amount'] = 1;\n  }\n}\n";
    let a = analyzer();
    let ctx = a.analyze("billing.php", src);
    let offset = ctx.detections.credential_fields[0].byte_offset;
    let scope = a.enclosing_scope("billing.php", src, offset);
    assert_eq!(scope.function.as_deref(), Some("charge"));
    assert_eq!(scope.class.as_deref(), Some("Billing"));
}

#[test]
fn partially_migrated_file_reports_target_hits() {
    let src = "const url = 'https://api.converge.eu.elavonaws.com/transactions';\nssl_amount";
    let ctx = analyzer().analyze("mixed.ts", src);
    assert!(ctx.target_detections > 0);
    assert_eq!(ctx.credential_fields, vec!["ssl_amount"]);
}
