/**
 * @file boleto_shared_test.rs
 * @brief Tests for the serialized, async-friendly facade handle
 */
use super::facade;
use super::mock::{MockNative, Response};
use crate::ffi::bindings::*;
use crate::{ErrorKind, SharedBoleto};

#[tokio::test]
async fn test_run_on_blocking_pool() {
    let mock = MockNative::new();
    mock.script(BOLETO_TOTAL_TITULOS_LISTA, Response::ok("3"));
    let shared = SharedBoleto::new(facade(&mock));

    shared.run(|boleto| boleto.initialize("", "")).await.unwrap();
    let total = shared.run(|boleto| boleto.total_titles()).await.unwrap();
    assert_eq!(total, 3);
}

#[tokio::test]
async fn test_run_propagates_native_errors() {
    let mock = MockNative::new();
    mock.script(BOLETO_GERAR_PDF, Response::status(-10));
    mock.script(BOLETO_ULTIMO_RETORNO, Response::ok("Nenhum título"));
    let shared = SharedBoleto::new(facade(&mock));

    let err = shared.run(|boleto| boleto.generate_pdf()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MethodCall);
    assert_eq!(err.message(), "Nenhum título");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_are_serialized() {
    let mock = MockNative::new();
    let shared = SharedBoleto::new(facade(&mock));

    let handles: Vec<_> = (0..16)
        .map(|index| {
            let shared = shared.clone();
            tokio::spawn(async move {
                shared
                    .run(move |boleto| boleto.print_title(index, "PDF"))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(mock.count(BOLETO_IMPRIMIR_BOLETO), 16);
}

#[test]
fn test_lock_gives_synchronous_access() {
    let mock = MockNative::new();
    mock.script(BOLETO_NOME, Response::ok("ACBrLibBoleto"));
    let shared = SharedBoleto::new(facade(&mock));

    let name = shared.lock().unwrap().library_name().unwrap();
    assert_eq!(name, "ACBrLibBoleto");
}

#[test]
fn test_last_clone_finalizes_on_drop() {
    let mock = MockNative::new();
    let shared = SharedBoleto::new(facade(&mock));
    shared.lock().unwrap().initialize("", "").unwrap();

    let other = shared.clone();
    drop(shared);
    assert_eq!(mock.count(BOLETO_FINALIZAR), 0);
    drop(other);
    assert_eq!(mock.count(BOLETO_FINALIZAR), 1);
}
