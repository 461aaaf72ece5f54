//! End-to-end test of the handler-coverage pipeline: generated services on
//! disk, user source calling them, and a registered handler list, cross
//! referenced into a missing-handler report.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use openapi_sync::Result;
use openapi_sync::lint::{
    HandlerDescriptor, HandlerSource, collect_existing_handlers, find_services_usages,
    missing_handlers,
};

struct StaticHandlerSource(Vec<HandlerDescriptor>);

impl HandlerSource for StaticHandlerSource {
    fn list_registered_routes(&self) -> Result<Vec<HandlerDescriptor>> {
        Ok(self.0.clone())
    }
}

fn descriptor(method: &str, path: &str) -> HandlerDescriptor {
    HandlerDescriptor {
        method: Some(method.to_string()),
        path: Some(path.to_string()),
    }
}

/// Lay out a generated client with one service exposing two routes.
fn write_generated_client(root: &Path) -> PathBuf {
    let gen_dir = root.join("gen");
    fs::create_dir_all(gen_dir.join("services")).unwrap();
    fs::write(
        gen_dir.join("services").join("UserService.ts"),
        r"
import type { CancelablePromise } from '../core/CancelablePromise';
import { OpenAPI } from '../core/OpenAPI';
import { request as __request } from '../core/request';

export class UserService {
  public static getUserById(id: string): CancelablePromise<User> {
    return __request(OpenAPI, {
      method: 'GET',
      url: '/api/users/{id}',
      path: { id },
    });
  }

  public static createUser(requestBody: UserCreate): CancelablePromise<User> {
    return __request(OpenAPI, {
      method: 'POST',
      url: '/api/users',
      body: requestBody,
    });
  }
}
",
    )
    .unwrap();
    gen_dir
}

fn write_app_source(root: &Path) -> PathBuf {
    let src = root.join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(
        src.join("profile.tsx"),
        r"
export async function loadProfile(id: string) {
  return UserService.getUserById(id);
}
",
    )
    .unwrap();
    fs::write(
        src.join("signup.ts"),
        r"
export const signup = (payload: UserCreate) => UserService.createUser(payload);
",
    )
    .unwrap();
    src
}

#[test]
fn test_uncovered_usage_surfaces_with_suggested_handler_path() {
    let temp_dir = TempDir::new().unwrap();
    let gen_dir = write_generated_client(temp_dir.path());
    let src = write_app_source(temp_dir.path());

    let usages = find_services_usages(&gen_dir, &src).unwrap();
    assert_eq!(usages.len(), 1);
    assert_eq!(usages.get("UserService").unwrap().len(), 2);

    // getUserById is registered with an origin-prefixed wildcard and a
    // :param-style path, createUser is not registered at all.
    let source = StaticHandlerSource(vec![
        descriptor("get", "*/api/users/:id"),
        HandlerDescriptor::default(),
    ]);
    let existing = collect_existing_handlers(&source).unwrap();
    assert!(existing.contains_key("GET:*/api/users/{id}"));

    let mocks_dir = temp_dir.path().join("mocks");
    let missing = missing_handlers(&usages, &existing, &mocks_dir);

    assert_eq!(missing.len(), 1);
    let entry = &missing[0];
    assert_eq!(entry.service.name, "UserService");
    assert_eq!(entry.service.method_name, "createUser");
    assert_eq!(entry.service.to_handle_http_method, "POST");
    assert_eq!(entry.service.to_handle_url, "/api/users");
    assert_eq!(entry.used_in.len(), 1);
    assert!(entry.used_in[0].ends_with("signup.ts"));
    assert_eq!(
        entry.suggested_path,
        mocks_dir
            .join("handlers")
            .join("services")
            .join("UserService")
            .join("createUser.ts")
    );
}

#[test]
fn test_fully_covered_project_reports_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let gen_dir = write_generated_client(temp_dir.path());
    let src = write_app_source(temp_dir.path());

    let usages = find_services_usages(&gen_dir, &src).unwrap();
    let source = StaticHandlerSource(vec![
        descriptor("GET", "/api/users/:id"),
        descriptor("POST", "/api/users"),
    ]);
    let existing = collect_existing_handlers(&source).unwrap();

    let missing = missing_handlers(&usages, &existing, temp_dir.path());
    assert!(missing.is_empty());
}
